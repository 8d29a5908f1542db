//! Lesson metadata catalog

use std::collections::HashMap;

use crate::api::{LessonId, LevelInfo};
use crate::curriculum::{ChapterId, CurriculumIndex};

/// How the platform reports a lesson's results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultType {
    #[default]
    Standard,
    /// Time-boxed rote lesson scored by earned stars
    FillDrill,
    Rote,
}

impl ResultType {
    /// Parse the platform's `resultType` tag; unknown tags are standard
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("fillDrill") => Self::FillDrill,
            Some("rote") => Self::Rote,
            _ => Self::Standard,
        }
    }
}

/// Everything the report needs to know about a lesson
#[derive(Debug, Clone, PartialEq)]
pub struct LessonMeta {
    pub id: LessonId,
    pub display_name: String,
    pub chapter_id: ChapterId,
    pub chapter_name: String,
    pub result_type: ResultType,
}

/// Read-only lesson lookup, built once per run
#[derive(Debug, Clone, Default)]
pub struct LessonCatalog {
    lessons: HashMap<LessonId, LessonMeta>,
    /// Platform-declared lesson order per chapter
    order: HashMap<ChapterId, Vec<LessonId>>,
}

impl LessonCatalog {
    /// Build the catalog from a `getBlocks` response
    pub fn build(level_info: &LevelInfo, curriculum: &CurriculumIndex) -> Self {
        let mut catalog = Self::default();

        for (&chapter_id, chapter) in &level_info.chapters {
            let chapter_name = match curriculum.chapter_name(chapter_id) {
                Some(name) => name.to_string(),
                None => {
                    tracing::warn!(chapter_id, "chapter is not in the curriculum index");
                    format!("Chapter {}", chapter_id)
                }
            };

            let ids = chapter.blocks.iter().map(|block| block.id).collect();
            catalog.order.insert(chapter_id, ids);

            for block in &chapter.blocks {
                catalog.lessons.insert(
                    block.id,
                    LessonMeta {
                        id: block.id,
                        display_name: block.display_name.clone(),
                        chapter_id,
                        chapter_name: chapter_name.clone(),
                        result_type: ResultType::from_tag(block.result_type()),
                    },
                );
            }
        }

        tracing::debug!(lessons = catalog.lessons.len(), "lesson catalog built");
        catalog
    }

    /// Look up a lesson
    pub fn get(&self, id: LessonId) -> Option<&LessonMeta> {
        self.lessons.get(&id)
    }

    /// Lessons of a chapter in platform order
    pub fn chapter_lessons(&self, chapter: ChapterId) -> &[LessonId] {
        self.order.get(&chapter).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of blocks the platform lists for a chapter, test included
    pub fn lesson_count(&self, chapter: ChapterId) -> usize {
        self.chapter_lessons(chapter).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::level_info;

    #[test]
    fn result_type_tags() {
        assert_eq!(ResultType::from_tag(Some("fillDrill")), ResultType::FillDrill);
        assert_eq!(ResultType::from_tag(Some("rote")), ResultType::Rote);
        assert_eq!(ResultType::from_tag(Some("standard")), ResultType::Standard);
        assert_eq!(ResultType::from_tag(None), ResultType::Standard);
    }

    #[test]
    fn catalog_keeps_platform_order_and_names() {
        let info =
            level_info(vec![(78, vec![(11, "Groups", None), (10, "Flash", Some("fillDrill"))])]);
        let catalog = LessonCatalog::build(&info, &CurriculumIndex::builtin());

        assert_eq!(catalog.chapter_lessons(78), &[11, 10]);
        assert_eq!(catalog.lesson_count(78), 2);
        assert_eq!(catalog.lessons.len(), 2);

        let flash = catalog.get(10).unwrap();
        assert_eq!(flash.display_name, "Flash");
        assert_eq!(flash.chapter_name, "Counting");
        assert_eq!(flash.result_type, ResultType::FillDrill);
    }

    #[test]
    fn unknown_chapter_gets_placeholder_name() {
        let info = level_info(vec![(999, vec![(1, "Mystery", None)])]);
        let catalog = LessonCatalog::build(&info, &CurriculumIndex::builtin());
        assert_eq!(catalog.get(1).unwrap().chapter_name, "Chapter 999");
        assert!(catalog.chapter_lessons(78).is_empty());
    }
}
