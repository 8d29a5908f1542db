//! Lesson scoring
//!
//! A lesson's mastery score is the mean of the sub-scores of its most
//! recent completed attempts, rounded to three decimals.

use serde::{Deserialize, Serialize};

use super::attempt::{AttemptPayload, AttemptRecord};
use super::error::MalformedAttempt;
use super::lessons::{LessonMeta, ResultType};

/// Fill drill scores for attempts that earned fewer than three stars
///
/// Fill drills are timed, so a student can answer nearly everything
/// correctly and still earn a single star. Below three stars the earned
/// star count replaces the raw correct rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StarScores {
    pub two_stars: f64,
    pub one_star: f64,
    pub no_stars: f64,
}

impl Default for StarScores {
    fn default() -> Self {
        Self { two_stars: 0.8, one_star: 0.7, no_stars: 0.6 }
    }
}

impl StarScores {
    /// Map a fill drill's raw rate through the star table
    pub fn apply(&self, stars: Option<u8>, base_rate: f64) -> f64 {
        match stars {
            Some(3) => base_rate,
            Some(2) => self.two_stars,
            Some(1) => self.one_star,
            _ => self.no_stars,
        }
    }
}

/// Tunable mastery rules
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MasteryPolicy {
    /// Minimum score for mastery
    pub threshold: f64,
    /// Completed attempts needed before a lesson can count as mastered
    pub min_attempts: usize,
    /// How many of the most recent completed attempts are scored
    pub recent_attempts: usize,
    pub star_scores: StarScores,
}

impl Default for MasteryPolicy {
    fn default() -> Self {
        Self {
            threshold: 0.85,
            min_attempts: 3,
            recent_attempts: 3,
            star_scores: StarScores::default(),
        }
    }
}

impl MasteryPolicy {
    pub fn is_mastered(&self, score: f64, completed: usize) -> bool {
        score >= self.threshold && completed >= self.min_attempts
    }
}

/// Score of a single completed attempt, in [0, 1]
pub fn sub_score(
    attempt: &AttemptRecord,
    meta: &LessonMeta,
    stars: &StarScores,
) -> Result<f64, MalformedAttempt> {
    match &attempt.payload {
        AttemptPayload::Standard { questions } => {
            if questions.is_empty() {
                return Ok(0.0);
            }
            let correct = questions.iter().filter(|q| q.is_first_try_correct()).count();
            Ok(correct as f64 / questions.len() as f64)
        }
        AttemptPayload::Rote { num_correct, trial_count } => {
            let base_rate = if *trial_count == 0 {
                0.0
            } else {
                (*num_correct as f64 / *trial_count as f64).min(1.0)
            };
            if *num_correct as usize > *trial_count {
                tracing::warn!(
                    num_correct,
                    trial_count,
                    "rote attempt counts more correct answers than trials"
                );
            }

            match meta.result_type {
                ResultType::FillDrill => Ok(stars.apply(attempt.stars, base_rate)),
                ResultType::Standard | ResultType::Rote => Ok(base_rate),
            }
        }
        AttemptPayload::Unscored => Err(MalformedAttempt::MissingProgress),
    }
}

/// Mastery score of a lesson from its completed attempts, newest first
///
/// Only the `policy.recent_attempts` newest attempts count. No attempts
/// scores 0.0.
pub fn score<'a, I>(
    completed: I,
    meta: &LessonMeta,
    policy: &MasteryPolicy,
) -> Result<f64, MalformedAttempt>
where
    I: IntoIterator<Item = &'a AttemptRecord>,
{
    let scores = completed
        .into_iter()
        .take(policy.recent_attempts)
        .map(|attempt| sub_score(attempt, meta, &policy.star_scores))
        .collect::<Result<Vec<_>, _>>()?;

    if scores.is_empty() {
        return Ok(0.0);
    }

    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    Ok(round_to(mean, 3))
}

/// Round half to even at the given number of decimals
///
/// Ties are judged on the exact binary value: `0.0375` is stored just
/// below the midpoint and rounds to `0.037`.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;

    let rounded = if scaled - scaled.floor() == 0.5 {
        // The product may have been rounded onto the midpoint. Its exact
        // error says which side the true value is on
        let error = value.mul_add(factor, -scaled);
        if error > 0.0 {
            scaled.ceil()
        } else if error < 0.0 {
            scaled.floor()
        } else {
            scaled.round_ties_even()
        }
    } else {
        scaled.round_ties_even()
    };
    rounded / factor
}
