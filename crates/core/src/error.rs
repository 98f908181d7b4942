//! Error types for Lacuna operations.
//!
//! This module defines the main error type [`LacunaError`] which represents
//! all possible errors that can occur while loading lookup tables, fetching
//! pages, and turning paragraphs into cloze exercises.
//!
//! # Example
//!
//! ```rust
//! use lacuna_core::{LacunaError, Result};
//!
//! fn require_text(text: &str) -> Result<&str> {
//!     if text.is_empty() {
//!         return Err(LacunaError::InvalidArgument("text is empty".to_string()));
//!     }
//!     Ok(text)
//! }
//!
//! assert!(require_text("").is_err());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Message shown when a required parameter is missing or malformed.
pub const MESSAGE_INVALID_PARAMETER: &str = "No processing possible. Parameter invalid!";

/// Message shown for pages other than Wikipedia articles.
pub const MESSAGE_ONLY_WIKI_SUPPORTED: &str = "No processing possible. Only Wikipedia pages supported!";

/// Message shown when the page language has no lookup tables.
pub const MESSAGE_LANGUAGE_NOT_SUPPORTED: &str = "No processing possible. Language not supported!";

/// Main error type for cloze operations.
///
/// The first three variants are request validation failures. The top-level
/// entry point turns them into a rendered message page (see
/// [`LacunaError::user_message`]); every other variant is a hard failure
/// that propagates to the caller.
///
/// # Example
///
/// ```rust
/// use lacuna_core::LacunaError;
///
/// let err = LacunaError::UnsupportedLanguage("da".to_string());
/// assert_eq!(err.user_message(), Some("No processing possible. Language not supported!"));
///
/// let err = LacunaError::InvalidEncoding;
/// assert_eq!(err.user_message(), None);
/// ```
#[derive(Error, Debug)]
pub enum LacunaError {
    /// A required argument was empty or could not be interpreted.
    ///
    /// Covers empty paragraph text, an empty session language, and unknown
    /// word-class names.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The URL does not point at a Wikipedia page.
    #[error("Not a Wikipedia page: {0}")]
    NotWikipedia(String),

    /// The page language is not listed in the supported languages.
    #[error("Language not supported: {0:?}")]
    UnsupportedLanguage(String),

    /// HTTP request errors from reqwest.
    ///
    /// This variant wraps network errors, DNS failures, connection issues,
    /// and other HTTP-related problems.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    ///
    /// Returned when an HTTP request exceeds the configured timeout duration.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided to the fetcher.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTML parsing or rewriting errors.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// The rewritten document is not valid UTF-8.
    #[error("Invalid character encoding")]
    InvalidEncoding,

    /// File not found.
    ///
    /// Returned when a configuration file or input file doesn't exist.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// An exercise could not be serialized to JSON.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Standard I/O errors while reading configuration or input.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Lookup-table configuration errors.
    ///
    /// Returned when the table directory is missing, is not a directory,
    /// or cannot be read. The engine cannot run without its tables.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl LacunaError {
    /// Returns the learner-facing message for request validation failures.
    ///
    /// Returns `None` for errors that are not caused by the request itself.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            LacunaError::InvalidArgument(_) => Some(MESSAGE_INVALID_PARAMETER),
            LacunaError::NotWikipedia(_) => Some(MESSAGE_ONLY_WIKI_SUPPORTED),
            LacunaError::UnsupportedLanguage(_) => Some(MESSAGE_LANGUAGE_NOT_SUPPORTED),
            _ => None,
        }
    }
}

/// Result type alias for LacunaError.
///
/// This is a convenience alias for `std::result::Result<T, LacunaError>`.
pub type Result<T> = std::result::Result<T, LacunaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LacunaError::InvalidUrl("not a url".to_string());
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_timeout_error() {
        let err = LacunaError::Timeout { timeout: 30 };
        assert!(err.to_string().contains("30"));
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            LacunaError::InvalidArgument("cloze".to_string()).user_message(),
            Some(MESSAGE_INVALID_PARAMETER)
        );
        assert_eq!(
            LacunaError::NotWikipedia("https://www.google.de/".to_string()).user_message(),
            Some(MESSAGE_ONLY_WIKI_SUPPORTED)
        );
        assert_eq!(
            LacunaError::UnsupportedLanguage("da".to_string()).user_message(),
            Some(MESSAGE_LANGUAGE_NOT_SUPPORTED)
        );
        assert_eq!(LacunaError::ConfigError("missing".to_string()).user_message(), None);
    }

    #[test]
    fn test_unsupported_language_shows_empty_code() {
        let err = LacunaError::UnsupportedLanguage(String::new());
        assert!(err.to_string().contains("\"\""));
    }
}
