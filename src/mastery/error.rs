//! Error types for the mastery engine

use thiserror::Error;

use crate::api::LessonId;

/// A completed attempt is missing data needed to score it
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MalformedAttempt {
    /// No `progress.problems` block at all
    #[error("completed attempt has no progress data")]
    MissingProgress,

    /// A question has no outcome
    #[error("question {index} has no outcome")]
    MissingOutcome { index: usize },

    /// A question has no trial list
    #[error("question {index} has no trial list")]
    MissingTrials { index: usize },

    /// A rote attempt has no aggregate problem block
    #[error("rote attempt has no aggregate block")]
    MissingRoteBlock,

    /// A rote attempt's aggregate block has no correct count
    #[error("rote attempt has no correct count")]
    MissingCorrectCount,

    /// The record did not match the attempt shape at all
    #[error("unreadable attempt record: {reason}")]
    InvalidRecord { reason: String },
}

/// Why a lesson was left out of the report
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LessonError {
    /// The lesson entry carries no block id
    #[error("lesson `{key}` has no block id")]
    MissingBlockId { key: String },

    /// The block id is not in the lesson catalog
    #[error("lesson `{key}` refers to unknown block {block_id}")]
    UnknownLesson { key: String, block_id: LessonId },

    /// One of the lesson's completed attempts is malformed
    #[error("lesson {block_id}: {source}")]
    Malformed {
        block_id: LessonId,
        #[source]
        source: MalformedAttempt,
    },
}
