//! Chapter discovery
//!
//! The platform unlocks chapters strictly in curriculum order, so the first
//! chapter without any lesson activity marks the frontier: nothing after it
//! has been started. [`ChapterWalk`] fetches chapter reports lazily in
//! curriculum order and stops at that frontier, keeping the number of
//! requests proportional to the student's progress rather than to the size
//! of the curriculum.

use std::collections::BTreeMap;
use std::iter::FusedIterator;

use crate::api::models::LessonResults;
use crate::api::{ApiError, ChapterReportResponse, StudentId, Transport};
use crate::curriculum::{ChapterId, CurriculumIndex};

/// Lesson key of the chapter's aggregate test entry, which is not a lesson
pub const TEST_KEY: &str = "test";

/// One student's results for one chapter
#[derive(Debug, Clone, Default)]
pub struct ChapterReport {
    pub chapter_id: ChapterId,
    /// Lesson key → attempts, including the `test` pseudo-entry
    pub lessons: BTreeMap<String, LessonResults>,
}

impl ChapterReport {
    /// Pick the student's results out of a `getBlockResults` response
    pub fn from_response(
        chapter_id: ChapterId,
        student_id: StudentId,
        mut response: ChapterReportResponse,
    ) -> Self {
        let Some(student) = response.students.remove(&student_id) else {
            tracing::warn!(chapter_id, student_id, "student missing from chapter report");
            return Self { chapter_id, lessons: BTreeMap::new() };
        };

        if let Some(reported) = student.chapter_totals.and_then(|t| t.chapter_id) {
            if reported != chapter_id {
                tracing::warn!(chapter_id, reported, "chapter report is for a different chapter");
            }
        }

        Self { chapter_id, lessons: student.by_block_number }
    }

    /// A chapter is started once any lesson has activity
    pub fn is_started(&self) -> bool {
        !self.lessons.is_empty()
    }

    /// Real lessons, without the `test` pseudo-entry
    pub fn lessons(&self) -> impl Iterator<Item = (&str, &LessonResults)> {
        self.lessons
            .iter()
            .filter(|(key, _)| key.as_str() != TEST_KEY)
            .map(|(key, results)| (key.as_str(), results))
    }
}

/// Lazy walk over the curriculum that stops at the frontier
///
/// Yields every started chapter in curriculum order. The walk ends at the
/// first unstarted chapter, or right after yielding a transport error. A
/// new walk always starts again from the first chapter.
pub struct ChapterWalk<'a, T: Transport + ?Sized> {
    transport: &'a T,
    curriculum: &'a CurriculumIndex,
    student_id: StudentId,
    level: usize,
    chapter: usize,
    done: bool,
}

impl<'a, T: Transport + ?Sized> ChapterWalk<'a, T> {
    pub fn new(transport: &'a T, curriculum: &'a CurriculumIndex, student_id: StudentId) -> Self {
        Self { transport, curriculum, student_id, level: 0, chapter: 0, done: false }
    }

    /// Next chapter id in curriculum order, logging level changes
    fn advance(&mut self) -> Option<ChapterId> {
        let curriculum = self.curriculum;
        loop {
            let level = curriculum.levels().get(self.level)?;
            if let Some(&chapter_id) = level.chapters.get(self.chapter) {
                if self.chapter == 0 {
                    tracing::info!(level = %level.name, "getting the active chapters");
                }
                self.chapter += 1;
                return Some(chapter_id);
            }
            self.level += 1;
            self.chapter = 0;
        }
    }
}

impl<T: Transport + ?Sized> Iterator for ChapterWalk<'_, T> {
    type Item = Result<ChapterReport, ApiError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let Some(chapter_id) = self.advance() else {
            self.done = true;
            return None;
        };

        match self.transport.fetch_chapter_report(chapter_id) {
            Ok(response) => {
                let report = ChapterReport::from_response(chapter_id, self.student_id, response);
                if report.is_started() {
                    tracing::debug!(chapter_id, lessons = report.lessons.len(), "chapter started");
                    Some(Ok(report))
                } else {
                    tracing::info!(chapter_id, "reached the first unstarted chapter");
                    self.done = true;
                    None
                }
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<T: Transport + ?Sized> FusedIterator for ChapterWalk<'_, T> {}

/// Fetch every started chapter, stopping at the frontier
pub fn walk<T: Transport + ?Sized>(
    transport: &T,
    curriculum: &CurriculumIndex,
    student_id: StudentId,
) -> Result<Vec<ChapterReport>, ApiError> {
    ChapterWalk::new(transport, curriculum, student_id).collect()
}

/// Result of fetching a single requested chapter
#[derive(Debug)]
pub enum SingleChapter {
    Started(ChapterReport),
    NotStarted,
}

/// Fetch exactly one chapter, skipping the walk
pub fn fetch_single<T: Transport + ?Sized>(
    transport: &T,
    chapter_id: ChapterId,
    student_id: StudentId,
) -> Result<SingleChapter, ApiError> {
    let response = transport.fetch_chapter_report(chapter_id)?;
    let report = ChapterReport::from_response(chapter_id, student_id, response);

    if report.is_started() {
        Ok(SingleChapter::Started(report))
    } else {
        Ok(SingleChapter::NotStarted)
    }
}
