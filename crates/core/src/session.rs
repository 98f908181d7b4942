//! Request-scoped transformation settings.

use serde::Serialize;

use crate::lookup::WordClass;
use crate::{LacunaError, Result};

/// Language and word class for one request.
///
/// A session is built per request and never mutated, so concurrent requests
/// cannot observe each other's settings.
///
/// # Example
///
/// ```rust
/// use lacuna_core::{TransformSession, WordClass};
///
/// let session = TransformSession::new("de", WordClass::Pronouns).unwrap();
/// assert_eq!(session.language(), "de");
/// assert!(TransformSession::new("", WordClass::Pronouns).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformSession {
    language: String,
    word_class: WordClass,
}

impl TransformSession {
    /// Creates a session.
    ///
    /// # Errors
    ///
    /// Returns [`LacunaError::InvalidArgument`] if `language` is empty.
    pub fn new(language: impl Into<String>, word_class: WordClass) -> Result<Self> {
        let language = language.into();
        if language.is_empty() {
            return Err(LacunaError::InvalidArgument("session language is empty".to_string()));
        }
        Ok(Self { language, word_class })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn word_class(&self) -> WordClass {
        self.word_class
    }
}
