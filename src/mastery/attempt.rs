//! Attempt classification and ingestion
//!
//! Raw attempt records come in two incompatible shapes. Standard attempts
//! list every question with its outcome and trials; rote attempts (set
//! number `G`) carry a single aggregate block with a correct count. The
//! shape is decided once here and captured in [`AttemptPayload`].
//!
//! Ordering and completion only look at an attempt's header fields, so an
//! attempt's payload is decoded only when it is actually scored.

use crate::api::models::RawProblem;
use crate::api::{AttemptSlot, RawAttempt};

use super::error::MalformedAttempt;

/// Set number that marks a rote-style record
pub const ROTE_SET_NUMBER: &str = "G";

/// Finish status value of a completed attempt
const COMPLETED: &str = "completed";

/// Whether an attempt was finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishStatus {
    Completed,
    Other,
}

impl FinishStatus {
    /// Anything other than `completed`, including a missing field, is `Other`
    pub fn parse(status: Option<&str>) -> Self {
        match status {
            Some(COMPLETED) => Self::Completed,
            _ => Self::Other,
        }
    }
}

/// How an attempt is scored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringMode {
    /// Per-question outcomes
    Standard,
    /// Aggregate correct count over a trial list
    Rote,
}

/// Decide the scoring mode of a raw attempt
pub fn classify(attempt: &RawAttempt) -> ScoringMode {
    match attempt.set_number.as_deref() {
        Some(ROTE_SET_NUMBER) => ScoringMode::Rote,
        _ => ScoringMode::Standard,
    }
}

/// Is the attempt completed? Never fails on a missing field.
pub fn is_completed(attempt: &AttemptSlot) -> bool {
    FinishStatus::parse(attempt.finish_status()) == FinishStatus::Completed
}

/// Did the student reach the end of the lesson?
pub fn reached_end(attempt: &AttemptSlot) -> bool {
    attempt.percent_complete() == Some(1.0)
}

/// Outcome of a single question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// One answered question of a standard attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub outcome: Outcome,
    /// Number of tries the student needed
    pub trial_count: usize,
}

impl Question {
    /// Correct on the first try; a retried question never counts
    pub fn is_first_try_correct(&self) -> bool {
        self.outcome == Outcome::Correct && self.trial_count == 1
    }
}

/// Scoring data of an attempt
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptPayload {
    Standard { questions: Vec<Question> },
    Rote { num_correct: u32, trial_count: usize },
    /// Unfinished attempt; its progress is never inspected
    Unscored,
}

/// An ingested attempt
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptRecord {
    pub status: FinishStatus,
    /// Platform timestamp, e.g. `2024-03-01T17:45:12.000Z`
    pub finished_at: Option<String>,
    /// Earned stars (0-3), meaningful for fill drills
    pub stars: Option<u8>,
    pub payload: AttemptPayload,
}

impl AttemptRecord {
    /// Ingest a raw record. Only completed attempts must carry scoring data.
    pub fn from_raw(raw: &RawAttempt) -> Result<Self, MalformedAttempt> {
        let status = FinishStatus::parse(raw.finish_status.as_deref());
        let payload = match status {
            FinishStatus::Completed => parse_payload(raw)?,
            FinishStatus::Other => AttemptPayload::Unscored,
        };

        Ok(Self {
            status,
            finished_at: raw.finished_at.clone(),
            stars: raw.stars,
            payload,
        })
    }

    /// Ingest a slot; an attempt that did not parse at all is malformed
    pub fn from_slot(slot: &AttemptSlot) -> Result<Self, MalformedAttempt> {
        match slot {
            AttemptSlot::Parsed(raw) => Self::from_raw(raw),
            AttemptSlot::Unparsed { reason, .. } => {
                Err(MalformedAttempt::InvalidRecord { reason: reason.clone() })
            }
        }
    }
}

/// A lesson's attempts, most recent first
///
/// The platform already sends attempts newest first; the stable sort keeps
/// that order and only repairs it when timestamps disagree. Attempts with
/// no timestamp sink to the end.
pub fn newest_first(slots: &[AttemptSlot]) -> Vec<&AttemptSlot> {
    let mut attempts: Vec<&AttemptSlot> = slots.iter().collect();
    attempts.sort_by(|a, b| b.finished_at().cmp(&a.finished_at()));
    attempts
}

/// Ingest the newest `limit` completed attempts; older ones stay undecoded
pub fn ingest_recent(
    attempts: &[&AttemptSlot],
    limit: usize,
) -> Result<Vec<AttemptRecord>, MalformedAttempt> {
    attempts
        .iter()
        .filter(|slot| is_completed(slot))
        .take(limit)
        .map(|slot| AttemptRecord::from_slot(slot))
        .collect()
}

fn parse_payload(raw: &RawAttempt) -> Result<AttemptPayload, MalformedAttempt> {
    let problems = &raw.progress.as_ref().ok_or(MalformedAttempt::MissingProgress)?.problems;

    match classify(raw) {
        ScoringMode::Rote => {
            let block = problems.first().ok_or(MalformedAttempt::MissingRoteBlock)?;
            let num_correct = block
                .custom_state
                .as_ref()
                .and_then(|state| state.num_correct)
                .ok_or(MalformedAttempt::MissingCorrectCount)?;
            let trial_count = block.trials.as_ref().map(Vec::len).unwrap_or(0);

            Ok(AttemptPayload::Rote { num_correct, trial_count })
        }
        ScoringMode::Standard => {
            let questions = problems
                .iter()
                .enumerate()
                .map(|(index, problem)| parse_question(index, problem))
                .collect::<Result<_, _>>()?;

            Ok(AttemptPayload::Standard { questions })
        }
    }
}

fn parse_question(index: usize, problem: &RawProblem) -> Result<Question, MalformedAttempt> {
    let outcome = match problem.outcome.as_deref() {
        Some("correct") => Outcome::Correct,
        Some(_) => Outcome::Incorrect,
        None => return Err(MalformedAttempt::MissingOutcome { index }),
    };
    let trial_count =
        problem.trials.as_ref().map(Vec::len).ok_or(MalformedAttempt::MissingTrials { index })?;

    Ok(Question { outcome, trial_count })
}
