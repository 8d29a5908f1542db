//! Wire models for the reporting API
//!
//! These mirror the JSON the platform returns. Nearly every field is
//! optional, and an attempt that does not fit [`RawAttempt`] is kept as
//! [`AttemptSlot::Unparsed`], so one odd record cannot fail a whole
//! chapter. Validation happens later, when attempts are ingested by the
//! mastery engine.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::curriculum::ChapterId;

/// Platform lesson (block) identifier
pub type LessonId = u64;

/// Platform student identifier
pub type StudentId = u64;

/// Request body for `getBlocks`
#[derive(Debug, Clone, Serialize)]
pub struct BlocksRequest<'a> {
    #[serde(rename = "chapterIDs")]
    pub chapter_ids: &'a [ChapterId],
}

/// Request body for `getBlockResults`
#[derive(Debug, Clone, Serialize)]
pub struct BlockResultsRequest<'a> {
    #[serde(rename = "chapterID")]
    pub chapter_id: ChapterId,
    #[serde(rename = "studentIDs")]
    pub student_ids: &'a [StudentId],
}

/// Response of `getBlocks`: lesson metadata per chapter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LevelInfo {
    #[serde(default)]
    pub chapters: HashMap<ChapterId, ChapterBlocks>,
}

impl LevelInfo {
    /// Lessons of one chapter in platform-declared order
    pub fn blocks(&self, chapter: ChapterId) -> &[BlockInfo] {
        self.chapters.get(&chapter).map(|c| c.blocks.as_slice()).unwrap_or(&[])
    }
}

/// The lessons of a chapter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChapterBlocks {
    #[serde(default)]
    pub blocks: Vec<BlockInfo>,
}

/// Metadata for a single lesson
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockInfo {
    pub id: LessonId,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub set_list: Option<SetList>,
}

impl BlockInfo {
    /// The lesson's result type tag, if the platform sent one
    pub fn result_type(&self) -> Option<&str> {
        self.set_list.as_ref().and_then(|s| s.result_type.as_deref())
    }
}

/// Question set description of a lesson
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetList {
    #[serde(default)]
    pub result_type: Option<String>,
}

/// Error body the platform sends instead of a report
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub message: String,
}

/// Response of `getBlockResults`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChapterReportResponse {
    #[serde(default)]
    pub students: HashMap<StudentId, StudentReport>,
}

/// One student's results for a chapter
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentReport {
    #[serde(default)]
    pub chapter_totals: Option<ChapterTotals>,
    /// Lesson key → results. Includes the chapter's `test` pseudo-entry.
    #[serde(default)]
    pub by_block_number: BTreeMap<String, LessonResults>,
}

/// Chapter-level totals; only the id is used
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChapterTotals {
    #[serde(rename = "chapterID", default)]
    pub chapter_id: Option<ChapterId>,
}

/// All attempts at one lesson, most recent first
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LessonResults {
    #[serde(rename = "blockID", default)]
    pub block_id: Option<LessonId>,
    #[serde(default)]
    pub results: Vec<AttemptSlot>,
}

/// One entry of a lesson's result list
#[derive(Debug, Clone)]
pub enum AttemptSlot {
    Parsed(RawAttempt),
    /// Did not match [`RawAttempt`]; header fields are still read loosely
    Unparsed { value: Value, reason: String },
}

impl<'de> Deserialize<'de> for AttemptSlot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let parsed = RawAttempt::deserialize(&value);
        Ok(match parsed {
            Ok(raw) => Self::Parsed(raw),
            Err(e) => Self::Unparsed { reason: e.to_string(), value },
        })
    }
}

impl From<RawAttempt> for AttemptSlot {
    fn from(raw: RawAttempt) -> Self {
        Self::Parsed(raw)
    }
}

impl AttemptSlot {
    pub fn finish_status(&self) -> Option<&str> {
        match self {
            Self::Parsed(raw) => raw.finish_status.as_deref(),
            Self::Unparsed { value, .. } => value.get("finishStatus").and_then(Value::as_str),
        }
    }

    pub fn finished_at(&self) -> Option<&str> {
        match self {
            Self::Parsed(raw) => raw.finished_at.as_deref(),
            Self::Unparsed { value, .. } => value.get("finishedAt").and_then(Value::as_str),
        }
    }

    pub fn percent_complete(&self) -> Option<f64> {
        match self {
            Self::Parsed(raw) => raw.percent_complete,
            Self::Unparsed { value, .. } => value.get("percentComplete").and_then(Value::as_f64),
        }
    }

    /// Seconds spent on the attempt
    pub fn time_spent(&self) -> Option<f64> {
        match self {
            Self::Parsed(raw) => raw.time_spent,
            Self::Unparsed { value, .. } => match value.get("timeSpent")? {
                Value::String(s) => s.trim().parse().ok(),
                other => other.as_f64(),
            },
        }
    }
}

/// One attempt record exactly as the platform reports it
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAttempt {
    #[serde(default)]
    pub finish_status: Option<String>,
    #[serde(default)]
    pub finished_at: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub set_number: Option<String>,
    #[serde(default)]
    pub stars: Option<u8>,
    #[serde(rename = "objectID", default)]
    pub object_id: Option<LessonId>,
    #[serde(default)]
    pub progress: Option<RawProgress>,
    #[serde(default)]
    pub percent_complete: Option<f64>,
    /// Seconds spent; sometimes sent as a numeric string
    #[serde(default, deserialize_with = "number_or_string")]
    pub time_spent: Option<f64>,
}

/// Per-problem progress of an attempt
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProgress {
    #[serde(default)]
    pub problems: Vec<RawProblem>,
}

/// A question, or for rote lessons the single aggregate block
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProblem {
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub trials: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub custom_state: Option<CustomState>,
}

/// Aggregate state of a rote lesson
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomState {
    #[serde(default)]
    pub num_correct: Option<u32>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(f64),
    Text(String),
}

fn number_or_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Scalar::Number(n)) => Ok(Some(n)),
        Some(Scalar::Text(s)) => s.trim().parse().map(Some).map_err(serde::de::Error::custom),
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|value| match value {
        Scalar::Text(s) => s,
        Scalar::Number(n) => n.to_string(),
    }))
}
