//! Reporting API integration module
//!
//! Provides session cookie management, the blocking HTTP client and the
//! wire models of the platform's report endpoints.

pub mod auth;
pub mod client;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use auth::SessionCookie;
pub use client::{PlatformClient, Transport};
pub use error::ApiError;
pub use models::{
    AttemptSlot, ChapterReportResponse, LessonId, LevelInfo, RawAttempt, StudentId,
};
