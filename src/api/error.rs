//! Error types for the reporting API

use thiserror::Error;

/// Errors that can occur when talking to the reporting API
#[derive(Debug, Error)]
pub enum ApiError {
    /// Session cookie is not configured
    #[error("Session cookie not configured. Run `mastery-report login <cookie>`")]
    CookieNotFound,

    /// Failed to access system keyring
    #[error("Failed to access keyring: {0}")]
    KeyringError(String),

    /// Invalid cookie format
    #[error("Invalid session cookie. Expected one or more `name=value` pairs")]
    InvalidCookie,

    /// Student id is not configured
    #[error("Student id not configured. Run `mastery-report config --student-id <id>`")]
    StudentNotConfigured,

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// The platform refused access (status 403)
    #[error("ERROR {error} {message}")]
    Forbidden {
        /// Short error name from the platform
        error: String,
        /// Human readable explanation
        message: String,
    },

    /// API returned some other error status
    #[error("API error ({status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ApiError {
    /// Fatal errors abort the whole run without printing a report
    pub fn is_fatal(&self) -> bool {
        matches!(self, ApiError::Forbidden { .. })
    }

    /// Check if this error requires logging in again
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            ApiError::CookieNotFound
                | ApiError::InvalidCookie
                | ApiError::Forbidden { .. }
                | ApiError::Status { status: 401, .. }
        )
    }
}
