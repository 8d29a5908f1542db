//! Shared fixtures for unit tests

use std::cell::RefCell;
use std::collections::HashMap;

use crate::api::models::{
    BlockInfo, ChapterBlocks, ChapterTotals, CustomState, LessonResults, RawProblem, RawProgress,
    SetList, StudentReport,
};
use crate::api::{
    ApiError, AttemptSlot, ChapterReportResponse, LessonId, LevelInfo, RawAttempt, StudentId,
    Transport,
};
use crate::curriculum::{ChapterId, CurriculumIndex};
use crate::mastery::{AttemptRecord, LessonCatalog, LessonMeta, ResultType};

pub const STUDENT: StudentId = 4242;

/// In-memory transport that records which chapters were fetched
#[derive(Default)]
pub struct FakeTransport {
    reports: HashMap<ChapterId, ChapterReportResponse>,
    forbidden: Vec<ChapterId>,
    level_info: LevelInfo,
    fetched: RefCell<Vec<ChapterId>>,
}

impl FakeTransport {
    pub fn with_report(mut self, chapter: ChapterId, report: ChapterReportResponse) -> Self {
        self.reports.insert(chapter, report);
        self
    }

    pub fn with_forbidden(mut self, chapter: ChapterId) -> Self {
        self.forbidden.push(chapter);
        self
    }

    pub fn with_level_info(mut self, level_info: LevelInfo) -> Self {
        self.level_info = level_info;
        self
    }

    pub fn fetched(&self) -> Vec<ChapterId> {
        self.fetched.borrow().clone()
    }
}

impl Transport for FakeTransport {
    fn fetch_level_info(&self, chapter_ids: &[ChapterId]) -> Result<LevelInfo, ApiError> {
        let mut info = self.level_info.clone();
        info.chapters.retain(|id, _| chapter_ids.contains(id));
        Ok(info)
    }

    fn fetch_chapter_report(
        &self,
        chapter_id: ChapterId,
    ) -> Result<ChapterReportResponse, ApiError> {
        self.fetched.borrow_mut().push(chapter_id);
        if self.forbidden.contains(&chapter_id) {
            return Err(ApiError::Forbidden {
                error: "Forbidden".into(),
                message: "session expired".into(),
            });
        }
        Ok(self.reports.get(&chapter_id).cloned().unwrap_or_default())
    }
}

/// A chapter report whose lessons have the given keys and no attempts
pub fn report_with_lessons(keys: &[&str]) -> ChapterReportResponse {
    let lessons = keys
        .iter()
        .enumerate()
        .map(|(i, key)| (key.to_string(), lesson_results(i as LessonId + 1, Vec::new())))
        .collect();
    chapter_response(None, lessons)
}

/// Wrap lesson results into a response for [`STUDENT`]
pub fn chapter_response(
    chapter: Option<ChapterId>,
    lessons: Vec<(String, LessonResults)>,
) -> ChapterReportResponse {
    let student = StudentReport {
        chapter_totals: Some(ChapterTotals { chapter_id: chapter }),
        by_block_number: lessons.into_iter().collect(),
    };
    ChapterReportResponse { students: HashMap::from([(STUDENT, student)]) }
}

pub fn lesson_results(block_id: LessonId, results: Vec<RawAttempt>) -> LessonResults {
    let results = results.into_iter().map(AttemptSlot::from).collect();
    LessonResults { block_id: Some(block_id), results }
}

/// Completed standard attempt; each answer is `(correct, trials)`
pub fn standard_attempt(answers: &[(bool, usize)]) -> RawAttempt {
    let problems = answers
        .iter()
        .map(|&(correct, trials)| RawProblem {
            outcome: Some(if correct { "correct" } else { "incorrect" }.to_string()),
            trials: Some(vec![serde_json::Value::Null; trials]),
            custom_state: None,
        })
        .collect();

    RawAttempt {
        finish_status: Some("completed".into()),
        finished_at: Some("2024-03-01T17:45:12.000Z".into()),
        set_number: Some("1".into()),
        progress: Some(RawProgress { problems }),
        percent_complete: Some(1.0),
        time_spent: Some(300.0),
        ..RawAttempt::default()
    }
}

/// Completed rote (`G`) attempt
pub fn rote_attempt(num_correct: u32, trials: usize, stars: Option<u8>) -> RawAttempt {
    let block = RawProblem {
        outcome: None,
        trials: Some(vec![serde_json::Value::Null; trials]),
        custom_state: Some(CustomState { num_correct: Some(num_correct) }),
    };

    RawAttempt {
        finish_status: Some("completed".into()),
        finished_at: Some("2024-03-01T17:45:12.000Z".into()),
        set_number: Some("G".into()),
        stars,
        progress: Some(RawProgress { problems: vec![block] }),
        percent_complete: Some(1.0),
        time_spent: Some(60.0),
        ..RawAttempt::default()
    }
}

/// Completed one-question attempt with the given completion and duration
pub fn timed_attempt(percent_complete: f64, seconds: f64) -> RawAttempt {
    RawAttempt {
        percent_complete: Some(percent_complete),
        time_spent: Some(seconds),
        ..standard_attempt(&[(true, 1)])
    }
}

/// Ingested standard attempt with `correct` of `total` right on the first try
pub fn record_scoring(correct: usize, total: usize) -> AttemptRecord {
    let answers: Vec<(bool, usize)> = (0..total).map(|i| (i < correct, 1)).collect();
    AttemptRecord::from_raw(&standard_attempt(&answers)).expect("fixture is well formed")
}

pub fn rote_record(num_correct: u32, trials: usize, stars: Option<u8>) -> AttemptRecord {
    AttemptRecord::from_raw(&rote_attempt(num_correct, trials, stars))
        .expect("fixture is well formed")
}

pub fn meta(result_type: ResultType) -> LessonMeta {
    LessonMeta {
        id: 1,
        display_name: "Lesson".into(),
        chapter_id: 78,
        chapter_name: "Counting".into(),
        result_type,
    }
}

/// `getBlocks` response; lessons are `(id, name, resultType)`
pub fn level_info(
    chapters: Vec<(ChapterId, Vec<(LessonId, &str, Option<&str>)>)>,
) -> LevelInfo {
    let chapters = chapters
        .into_iter()
        .map(|(chapter, lessons)| {
            let blocks = lessons
                .into_iter()
                .map(|(id, name, tag)| BlockInfo {
                    id,
                    display_name: name.to_string(),
                    set_list: Some(SetList { result_type: tag.map(str::to_string) }),
                })
                .collect();
            (chapter, ChapterBlocks { blocks })
        })
        .collect();
    LevelInfo { chapters }
}

/// Catalog of one chapter of the built-in curriculum
pub fn catalog_with(chapter: ChapterId, lessons: &[(LessonId, ResultType)]) -> LessonCatalog {
    let lessons = lessons
        .iter()
        .map(|&(id, result_type)| {
            let tag = match result_type {
                ResultType::Standard => None,
                ResultType::FillDrill => Some("fillDrill"),
                ResultType::Rote => Some("rote"),
            };
            (id, "Lesson", tag)
        })
        .collect();
    LessonCatalog::build(&level_info(vec![(chapter, lessons)]), &CurriculumIndex::builtin())
}
