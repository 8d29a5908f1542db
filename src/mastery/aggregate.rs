//! Mastery aggregation
//!
//! Turns started chapter reports into one [`ReportEntry`] per lesson.
//! Lessons that cannot be scored are skipped and listed, never fatal.

use std::collections::HashMap;

use crate::api::models::LessonResults;
use crate::api::{AttemptSlot, LessonId};
use crate::curriculum::ChapterId;

use super::attempt;
use super::error::LessonError;
use super::lessons::LessonCatalog;
use super::scorer::{self, MasteryPolicy};
use super::walker::ChapterReport;

/// Length of the seconds-and-zone suffix cut from platform timestamps
const TIMESTAMP_SUFFIX_LEN: usize = 8;

/// Scored lesson, ready to be rendered
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    pub lesson_id: LessonId,
    pub chapter_id: ChapterId,
    pub chapter_name: String,
    pub lesson_name: String,
    /// Mastery score in [0, 1]
    pub score: f64,
    /// Completed attempts overall
    pub completed: usize,
    /// Completed attempts that went into the score
    pub scored: usize,
    /// Fastest full run, in whole minutes
    pub fastest_minutes: Option<u64>,
    /// Finish time of the newest completed attempt, to the minute
    pub last_finished: Option<String>,
    /// Enough completed attempts to judge mastery
    pub enough_attempts: bool,
    pub mastered: bool,
}

/// All entries of a run
#[derive(Debug, Clone, Default)]
pub struct MasterySummary {
    pub entries: HashMap<LessonId, ReportEntry>,
    pub mastered_count: usize,
    /// Lessons left out, with the reason
    pub skipped: Vec<LessonError>,
}

impl MasterySummary {
    /// Mastered lessons within one chapter
    pub fn mastered_in(&self, chapter: ChapterId) -> usize {
        self.entries.values().filter(|e| e.chapter_id == chapter && e.mastered).count()
    }
}

/// Score every lesson of the given chapters
pub fn aggregate(
    reports: &[ChapterReport],
    catalog: &LessonCatalog,
    policy: &MasteryPolicy,
) -> MasterySummary {
    let mut summary = MasterySummary::default();

    for report in reports {
        for (key, results) in report.lessons() {
            match aggregate_lesson(key, results, catalog, policy) {
                Ok(entry) => {
                    if entry.mastered {
                        summary.mastered_count += 1;
                    }
                    summary.entries.insert(entry.lesson_id, entry);
                }
                Err(e) => {
                    tracing::warn!(chapter_id = report.chapter_id, "skipping lesson: {}", e);
                    summary.skipped.push(e);
                }
            }
        }
    }

    tracing::info!(
        lessons = summary.entries.len(),
        mastered = summary.mastered_count,
        skipped = summary.skipped.len(),
        "aggregated mastery"
    );
    summary
}

/// Score one lesson's attempts
pub fn aggregate_lesson(
    key: &str,
    results: &LessonResults,
    catalog: &LessonCatalog,
    policy: &MasteryPolicy,
) -> Result<ReportEntry, LessonError> {
    let block_id = results.block_id.ok_or_else(|| LessonError::MissingBlockId { key: key.into() })?;
    let meta = catalog
        .get(block_id)
        .ok_or_else(|| LessonError::UnknownLesson { key: key.into(), block_id })?;

    let attempts = attempt::newest_first(&results.results);
    let completed: Vec<&AttemptSlot> =
        attempts.iter().copied().filter(|a| attempt::is_completed(a)).collect();

    let recent = attempt::ingest_recent(&completed, policy.recent_attempts)
        .map_err(|source| LessonError::Malformed { block_id, source })?;
    let score = scorer::score(&recent, meta, policy)
        .map_err(|source| LessonError::Malformed { block_id, source })?;

    Ok(ReportEntry {
        lesson_id: block_id,
        chapter_id: meta.chapter_id,
        chapter_name: meta.chapter_name.clone(),
        lesson_name: meta.display_name.clone(),
        score,
        completed: completed.len(),
        scored: recent.len(),
        fastest_minutes: fastest_minutes(attempts.iter().copied()),
        last_finished: completed.first().and_then(|a| a.finished_at()).map(trim_timestamp),
        enough_attempts: completed.len() >= policy.min_attempts,
        mastered: policy.is_mastered(score, completed.len()),
    })
}

/// Fastest run that reached the end of the lesson, rounded to minutes
pub fn fastest_minutes<'a>(attempts: impl IntoIterator<Item = &'a AttemptSlot>) -> Option<u64> {
    attempts
        .into_iter()
        .filter(|a| attempt::reached_end(a))
        .filter_map(AttemptSlot::time_spent)
        .map(|secs| (secs / 60.0).round_ties_even().max(0.0) as u64)
        .min()
}

/// Drop the trailing `:SS.mmmZ` of a platform timestamp
pub fn trim_timestamp(stamp: &str) -> String {
    let keep = stamp.chars().count().saturating_sub(TIMESTAMP_SUFFIX_LEN);
    stamp.chars().take(keep).collect()
}

/// Share of a chapter's lessons that are mastered
///
/// The platform lists the chapter test as one of the chapter's blocks, so
/// it is left out of the denominator. `None` if no lessons remain.
pub fn chapter_ratio(mastered: usize, lesson_count: usize) -> Option<f64> {
    let lessons = lesson_count.checked_sub(1).filter(|n| *n > 0)?;
    Some(mastered as f64 / lessons as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mastery::error::MalformedAttempt;
    use crate::mastery::lessons::ResultType;
    use crate::testing::{
        catalog_with, lesson_results, rote_attempt, standard_attempt, timed_attempt,
    };
    use pretty_assertions::assert_eq;

    fn policy() -> MasteryPolicy {
        MasteryPolicy { threshold: 0.85, min_attempts: 3, ..MasteryPolicy::default() }
    }

    fn scored(correct: usize, total: usize, finished_at: &str) -> crate::api::RawAttempt {
        let answers: Vec<(bool, usize)> = (0..total).map(|i| (i < correct, 1)).collect();
        let mut raw = standard_attempt(&answers);
        raw.finished_at = Some(finished_at.to_string());
        raw
    }

    #[test]
    fn three_attempts_below_threshold() {
        let catalog = catalog_with(78, &[(100, ResultType::Standard)]);
        let results = lesson_results(
            100,
            vec![
                scored(5, 5, "2024-03-03T10:00:00.000Z"),
                scored(4, 5, "2024-03-02T10:00:00.000Z"),
                scored(3, 5, "2024-03-01T10:00:00.000Z"),
            ],
        );

        let entry = aggregate_lesson("1", &results, &catalog, &policy()).unwrap();
        assert_eq!(entry.score, 0.8);
        assert_eq!(entry.completed, 3);
        assert_eq!(entry.scored, 3);
        assert!(entry.enough_attempts);
        assert!(!entry.mastered);
        assert_eq!(entry.last_finished.as_deref(), Some("2024-03-03T10:00"));
        assert_eq!(entry.chapter_name, "Counting");
    }

    #[test]
    fn high_score_with_enough_attempts_is_mastered() {
        let catalog = catalog_with(78, &[(100, ResultType::Standard)]);
        let results = lesson_results(
            100,
            vec![
                scored(10, 10, "2024-03-03T10:00:00.000Z"),
                scored(9, 10, "2024-03-02T10:00:00.000Z"),
                scored(8, 10, "2024-03-01T10:00:00.000Z"),
            ],
        );

        let entry = aggregate_lesson("1", &results, &catalog, &policy()).unwrap();
        assert_eq!(entry.score, 0.9);
        assert!(entry.mastered);
    }

    #[test]
    fn high_score_with_too_few_attempts_is_not_mastered() {
        let catalog = catalog_with(78, &[(100, ResultType::Standard)]);
        let results = lesson_results(
            100,
            vec![
                scored(20, 20, "2024-03-02T10:00:00.000Z"),
                scored(18, 20, "2024-03-01T10:00:00.000Z"),
            ],
        );

        let entry = aggregate_lesson("1", &results, &catalog, &policy()).unwrap();
        assert_eq!(entry.score, 0.95);
        assert!(!entry.enough_attempts);
        assert!(!entry.mastered);
    }

    #[test]
    fn unfinished_attempts_are_ignored_for_scoring() {
        let catalog = catalog_with(78, &[(100, ResultType::Standard)]);
        let mut abandoned = scored(0, 5, "2024-03-04T10:00:00.000Z");
        abandoned.finish_status = Some("started".into());
        abandoned.progress = None;

        let results =
            lesson_results(100, vec![abandoned, scored(5, 5, "2024-03-01T10:00:00.000Z")]);
        let entry = aggregate_lesson("1", &results, &catalog, &policy()).unwrap();

        assert_eq!(entry.completed, 1);
        assert_eq!(entry.score, 1.0);
        assert_eq!(entry.last_finished.as_deref(), Some("2024-03-01T10:00"));
    }

    #[test]
    fn malformed_attempt_outside_the_window_is_ignored() {
        let catalog = catalog_with(78, &[(100, ResultType::Standard)]);
        let mut stale = scored(0, 5, "2024-02-01T10:00:00.000Z");
        stale.progress = None;
        stale.percent_complete = Some(1.0);
        stale.time_spent = Some(30.0);

        let results = lesson_results(
            100,
            vec![
                stale,
                scored(5, 5, "2024-03-03T10:00:00.000Z"),
                scored(5, 5, "2024-03-02T10:00:00.000Z"),
                scored(5, 5, "2024-03-01T10:00:00.000Z"),
            ],
        );
        let entry = aggregate_lesson("1", &results, &catalog, &policy()).unwrap();

        assert_eq!(entry.score, 1.0);
        assert_eq!(entry.completed, 4);
        assert_eq!(entry.scored, 3);
        assert_eq!(entry.fastest_minutes, Some(0));
        assert_eq!(entry.last_finished.as_deref(), Some("2024-03-03T10:00"));
        assert!(entry.mastered);
    }

    #[test]
    fn mistyped_attempt_skips_only_its_lesson() {
        let value = serde_json::json!({
            "students": { "4242": { "byBlockNumber": {
                "1": { "blockID": 100, "results": [{
                    "finishStatus": "completed",
                    "finishedAt": "2024-03-01T10:00:00.000Z",
                    "setNumber": 1,
                    "progress": { "problems": [{ "outcome": "correct", "trials": [{}] }] }
                }]},
                "2": { "blockID": 101, "results": [{
                    "finishStatus": "completed",
                    "finishedAt": "2024-03-01T11:00:00.000Z",
                    "setNumber": "G",
                    "progress": { "problems": [
                        { "customState": { "numCorrect": "18" }, "trials": [{}] }
                    ]}
                }]}
            }}}
        });
        let response = serde_json::from_value(value).unwrap();
        let report = ChapterReport::from_response(78, crate::testing::STUDENT, response);
        let catalog = catalog_with(78, &[(100, ResultType::Standard), (101, ResultType::Rote)]);

        let summary = aggregate(&[report], &catalog, &policy());

        assert_eq!(summary.entries.len(), 1);
        assert_eq!(summary.entries[&100].score, 1.0);
        assert_eq!(summary.skipped.len(), 1);
        assert!(matches!(
            summary.skipped[0],
            LessonError::Malformed { block_id: 101, source: MalformedAttempt::InvalidRecord { .. } }
        ));
    }

    #[test]
    fn lesson_without_attempts_is_empty_not_an_error() {
        let catalog = catalog_with(78, &[(100, ResultType::Standard)]);
        let entry = aggregate_lesson("1", &lesson_results(100, vec![]), &catalog, &policy())
            .unwrap();

        assert_eq!(entry.score, 0.0);
        assert_eq!(entry.completed, 0);
        assert_eq!(entry.fastest_minutes, None);
        assert_eq!(entry.last_finished, None);
        assert!(!entry.mastered);
    }

    #[test]
    fn fastest_time_only_counts_full_runs() {
        let slots: [AttemptSlot; 2] =
            [timed_attempt(1.0, 125.0).into(), timed_attempt(0.5, 10.0).into()];
        assert_eq!(fastest_minutes(&slots), Some(2));

        let slots: [AttemptSlot; 1] = [timed_attempt(0.5, 10.0).into()];
        assert_eq!(fastest_minutes(&slots), None);

        let slots: [AttemptSlot; 3] = [
            timed_attempt(1.0, 400.0).into(),
            timed_attempt(1.0, 150.0).into(),
            timed_attempt(1.0, 90.0).into(),
        ];
        assert_eq!(fastest_minutes(&slots), Some(2));
    }

    #[test]
    fn fill_drill_lessons_use_stars() {
        let catalog = catalog_with(79, &[(200, ResultType::FillDrill)]);
        let results = lesson_results(
            200,
            vec![rote_attempt(20, 20, Some(2)), rote_attempt(20, 20, Some(1))],
        );
        let entry = aggregate_lesson("G", &results, &catalog, &policy()).unwrap();
        assert_eq!(entry.score, 0.75);
    }

    #[test]
    fn unknown_and_malformed_lessons_are_skipped() {
        let catalog = catalog_with(78, &[(100, ResultType::Standard), (101, ResultType::Standard)]);
        let mut broken = scored(1, 1, "2024-03-01T10:00:00.000Z");
        broken.progress = None;

        let mut report = ChapterReport { chapter_id: 78, ..Default::default() };
        report.lessons.insert(
            "1".into(),
            lesson_results(
                100,
                vec![
                    scored(5, 5, "2024-03-03T10:00:00.000Z"),
                    scored(5, 5, "2024-03-02T10:00:00.000Z"),
                    scored(5, 5, "2024-03-01T10:00:00.000Z"),
                ],
            ),
        );
        report.lessons.insert("2".into(), lesson_results(101, vec![broken]));
        report.lessons.insert("3".into(), lesson_results(999, vec![]));
        report.lessons.insert("test".into(), lesson_results(555, vec![]));

        let summary = aggregate(&[report], &catalog, &policy());

        assert_eq!(summary.entries.len(), 1);
        assert_eq!(summary.mastered_count, 1);
        assert_eq!(summary.mastered_in(78), 1);
        assert_eq!(
            summary.skipped,
            vec![
                LessonError::Malformed { block_id: 101, source: MalformedAttempt::MissingProgress },
                LessonError::UnknownLesson { key: "3".into(), block_id: 999 },
            ]
        );
    }

    #[test]
    fn timestamp_trimming() {
        assert_eq!(trim_timestamp("2024-03-01T17:45:12.000Z"), "2024-03-01T17:45");
        assert_eq!(trim_timestamp("short"), "");
    }

    #[test]
    fn chapter_ratio_excludes_the_test() {
        assert_eq!(chapter_ratio(3, 7), Some(0.5));
        assert_eq!(chapter_ratio(0, 1), None);
        assert_eq!(chapter_ratio(0, 0), None);
    }
}
