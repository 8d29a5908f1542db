//! Session cookie management using system keyring

use keyring::Entry;

use super::error::ApiError;

/// Service name for keyring storage
const SERVICE_NAME: &str = "mastery-report";
/// Entry name for the session cookie
const COOKIE_ENTRY: &str = "platform-session-cookie";
/// Environment variable that overrides the keyring
pub const COOKIE_ENV: &str = "MASTERY_REPORT_COOKIE";

/// Manages the platform session cookie in system keyring
pub struct SessionCookie;

impl SessionCookie {
    /// Get the cookie, preferring the environment over the keyring
    pub fn get() -> Result<String, ApiError> {
        if let Ok(cookie) = std::env::var(COOKIE_ENV) {
            if Self::validate_format(&cookie) {
                return Ok(cookie);
            }
            tracing::warn!("{} is set but not a valid cookie, falling back to keyring", COOKIE_ENV);
        }

        let entry = Entry::new(SERVICE_NAME, COOKIE_ENTRY)
            .map_err(|e| ApiError::KeyringError(e.to_string()))?;

        entry.get_password().map_err(|e| match e {
            keyring::Error::NoEntry => ApiError::CookieNotFound,
            _ => ApiError::KeyringError(e.to_string()),
        })
    }

    /// Store the cookie in system keyring
    pub fn set(cookie: &str) -> Result<(), ApiError> {
        let cookie = cookie.trim();
        if !Self::validate_format(cookie) {
            return Err(ApiError::InvalidCookie);
        }

        let entry = Entry::new(SERVICE_NAME, COOKIE_ENTRY)
            .map_err(|e| ApiError::KeyringError(e.to_string()))?;

        entry.set_password(cookie).map_err(|e| ApiError::KeyringError(e.to_string()))
    }

    /// Delete the stored cookie
    pub fn delete() -> Result<(), ApiError> {
        let entry = Entry::new(SERVICE_NAME, COOKIE_ENTRY)
            .map_err(|e| ApiError::KeyringError(e.to_string()))?;

        entry.delete_credential().map_err(|e| match e {
            keyring::Error::NoEntry => ApiError::CookieNotFound,
            _ => ApiError::KeyringError(e.to_string()),
        })
    }

    /// A cookie header is one or more `name=value` pairs separated by `;`
    fn validate_format(cookie: &str) -> bool {
        let pairs: Vec<&str> =
            cookie.split(';').map(str::trim).filter(|pair| !pair.is_empty()).collect();

        !pairs.is_empty()
            && pairs.iter().all(|pair| {
                pair.split_once('=').is_some_and(|(name, _)| !name.trim().is_empty())
            })
    }

    /// Mask a cookie for display (show cookie names only)
    pub fn mask(cookie: &str) -> String {
        cookie
            .split(';')
            .map(str::trim)
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((name, _)) => format!("{}=***", name.trim()),
                None => "***".to_string(),
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}
