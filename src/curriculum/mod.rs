//! Curriculum index
//!
//! The fixed level → chapter layout of the platform. Everything that walks
//! the curriculum reads it through [`CurriculumIndex`], which is built once
//! per run and passed around by reference.

mod data;

use std::collections::{HashMap, HashSet};

use thiserror::Error;

/// Platform chapter identifier
pub type ChapterId = u32;

/// Errors raised while building a curriculum index
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CurriculumError {
    /// A chapter id appears more than once
    #[error("Chapter {chapter} is listed more than once (again in level {level})")]
    DuplicateChapter { chapter: ChapterId, level: String },

    /// A chapter has no display name
    #[error("Chapter {0} has no display name")]
    MissingName(ChapterId),
}

/// One level of the curriculum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    /// Level name (e.g., "L3")
    pub name: String,
    /// Chapters in curriculum order
    pub chapters: Vec<ChapterId>,
}

impl Level {
    /// Create a new level
    pub fn new(name: impl Into<String>, chapters: Vec<ChapterId>) -> Self {
        Self { name: name.into(), chapters }
    }
}

/// Ordered levels plus chapter display names
#[derive(Debug, Clone)]
pub struct CurriculumIndex {
    levels: Vec<Level>,
    names: HashMap<ChapterId, String>,
}

impl CurriculumIndex {
    /// Build an index, checking that chapter ids are unique and named
    pub fn new(
        levels: Vec<Level>,
        names: HashMap<ChapterId, String>,
    ) -> Result<Self, CurriculumError> {
        let mut seen = HashSet::new();
        for level in &levels {
            for &chapter in &level.chapters {
                if !seen.insert(chapter) {
                    return Err(CurriculumError::DuplicateChapter {
                        chapter,
                        level: level.name.clone(),
                    });
                }
                if !names.contains_key(&chapter) {
                    return Err(CurriculumError::MissingName(chapter));
                }
            }
        }

        Ok(Self { levels, names })
    }

    /// The curriculum shipped with the binary
    pub fn builtin() -> Self {
        let levels = data::LEVELS
            .iter()
            .map(|(name, chapters)| Level::new(*name, chapters.to_vec()))
            .collect();
        let names =
            data::CHAPTER_NAMES.iter().map(|(id, name)| (*id, (*name).to_string())).collect();

        Self { levels, names }
    }

    /// Levels in curriculum order
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Every chapter id, flattened in curriculum order
    pub fn chapter_ids(&self) -> impl Iterator<Item = ChapterId> + '_ {
        self.levels.iter().flat_map(|level| level.chapters.iter().copied())
    }

    /// Display name of a chapter
    pub fn chapter_name(&self, chapter: ChapterId) -> Option<&str> {
        self.names.get(&chapter).map(String::as_str)
    }

    /// The level a chapter belongs to
    pub fn level_of(&self, chapter: ChapterId) -> Option<&Level> {
        self.levels.iter().find(|level| level.chapters.contains(&chapter))
    }

    /// Is the chapter part of this curriculum?
    pub fn contains(&self, chapter: ChapterId) -> bool {
        self.level_of(chapter).is_some()
    }
}

impl Default for CurriculumIndex {
    fn default() -> Self {
        Self::builtin()
    }
}
