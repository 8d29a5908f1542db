//! Mastery engine
//!
//! Walks the curriculum up to the student's frontier, scores every lesson
//! from its recent completed attempts and tags it mastered or not.

pub mod aggregate;
pub mod attempt;
pub mod error;
pub mod lessons;
pub mod scorer;
pub mod walker;

pub use aggregate::{MasterySummary, ReportEntry, aggregate, chapter_ratio};
pub use attempt::{AttemptPayload, AttemptRecord, FinishStatus, ScoringMode, classify, is_completed};
pub use error::{LessonError, MalformedAttempt};
pub use lessons::{LessonCatalog, LessonMeta, ResultType};
pub use scorer::{MasteryPolicy, StarScores, score};
pub use walker::{ChapterReport, ChapterWalk, SingleChapter, fetch_single, walk};

use crate::api::{ApiError, LevelInfo, StudentId, Transport};
use crate::curriculum::{ChapterId, CurriculumIndex};

/// Everything one run produces
#[derive(Debug, Clone)]
pub struct MasteryRun {
    /// Started chapters, in curriculum order
    pub chapters: Vec<ChapterId>,
    pub catalog: LessonCatalog,
    pub summary: MasterySummary,
}

/// Walk the whole curriculum and score every started chapter
pub fn run_walk<T: Transport + ?Sized>(
    transport: &T,
    curriculum: &CurriculumIndex,
    student_id: StudentId,
    policy: &MasteryPolicy,
) -> Result<MasteryRun, ApiError> {
    let reports = walk(transport, curriculum, student_id)?;
    score_reports(transport, curriculum, reports, policy)
}

/// Score a single chapter; `None` if the student has not started it
pub fn run_chapter<T: Transport + ?Sized>(
    transport: &T,
    curriculum: &CurriculumIndex,
    chapter_id: ChapterId,
    student_id: StudentId,
    policy: &MasteryPolicy,
) -> Result<Option<MasteryRun>, ApiError> {
    match fetch_single(transport, chapter_id, student_id)? {
        SingleChapter::Started(report) => {
            score_reports(transport, curriculum, vec![report], policy).map(Some)
        }
        SingleChapter::NotStarted => Ok(None),
    }
}

fn score_reports<T: Transport + ?Sized>(
    transport: &T,
    curriculum: &CurriculumIndex,
    reports: Vec<ChapterReport>,
    policy: &MasteryPolicy,
) -> Result<MasteryRun, ApiError> {
    let chapters: Vec<ChapterId> = reports.iter().map(|r| r.chapter_id).collect();

    let level_info = if chapters.is_empty() {
        LevelInfo::default()
    } else {
        transport.fetch_level_info(&chapters)?
    };
    let catalog = LessonCatalog::build(&level_info, curriculum);
    let summary = aggregate(&reports, &catalog, policy);

    Ok(MasteryRun { chapters, catalog, summary })
}
