//! HTTP client for the reporting API

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::COOKIE;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::models::{
    BlockResultsRequest, BlocksRequest, ChapterReportResponse, ErrorBody, LevelInfo, StudentId,
};
use crate::curriculum::ChapterId;

/// Source of platform data for the mastery engine
///
/// Every call is a blocking request on the calling thread. Implementations
/// own timeouts; the engine never retries.
pub trait Transport {
    /// Lesson metadata for the given chapters
    fn fetch_level_info(&self, chapter_ids: &[ChapterId]) -> Result<LevelInfo, ApiError>;

    /// All attempt records of the configured student for one chapter
    fn fetch_chapter_report(&self, chapter_id: ChapterId)
    -> Result<ChapterReportResponse, ApiError>;
}

/// Reporting API client
pub struct PlatformClient {
    /// HTTP client
    client: Client,
    /// Scheme and host, without trailing slash
    base_url: String,
    /// Session cookie header value
    cookie: String,
    /// Student whose reports are requested
    student_id: StudentId,
}

impl PlatformClient {
    /// Lesson metadata endpoint
    const BLOCKS_PATH: &'static str = "/api/report/getBlocks";
    /// Attempt results endpoint
    const RESULTS_PATH: &'static str = "/api/report/getBlockResults";

    /// Create a new client for one student
    pub fn new(
        base_url: impl Into<String>,
        cookie: String,
        student_id: StudentId,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url, cookie, student_id })
    }

    fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "POST");

        let response = self.client.post(&url).header(COOKIE, &self.cookie).json(body).send()?;
        let status = response.status();
        let text = response.text()?;

        // The platform reports errors both in the status line and in the body
        let value: serde_json::Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(_) if !status.is_success() => {
                return Err(status_error(status.as_u16(), String::new(), text));
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(err) = error_from_body(&value) {
            return Err(err);
        }

        if !status.is_success() {
            return Err(status_error(status.as_u16(), String::new(), text));
        }

        Ok(serde_json::from_value(value)?)
    }
}

impl Transport for PlatformClient {
    fn fetch_level_info(&self, chapter_ids: &[ChapterId]) -> Result<LevelInfo, ApiError> {
        self.post(Self::BLOCKS_PATH, &BlocksRequest { chapter_ids })
    }

    fn fetch_chapter_report(
        &self,
        chapter_id: ChapterId,
    ) -> Result<ChapterReportResponse, ApiError> {
        let student_ids = [self.student_id];
        let body = BlockResultsRequest { chapter_id, student_ids: &student_ids };
        self.post(Self::RESULTS_PATH, &body)
    }
}

/// Recognise an error body such as `{"statusCode": 403, "error": ..., "message": ...}`
fn error_from_body(value: &serde_json::Value) -> Option<ApiError> {
    value.get("statusCode")?;
    let body: ErrorBody = serde_json::from_value(value.clone()).ok()?;

    if body.status_code < 400 {
        return None;
    }
    Some(status_error(body.status_code, body.error, body.message))
}

fn status_error(status: u16, error: String, message: String) -> ApiError {
    if status == 403 {
        let error = if error.is_empty() { "Forbidden".to_string() } else { error };
        ApiError::Forbidden { error, message }
    } else {
        ApiError::Status { status, message }
    }
}
