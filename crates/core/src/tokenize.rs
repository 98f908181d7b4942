//! Paragraph tokenization.
//!
//! Text is split on runs of whitespace. A chunk ending in one of the
//! supported punctuation signs is split into a word token followed by a
//! punctuation token; every other chunk is a single word token.
//!
//! # Example
//!
//! ```rust
//! use lacuna_core::tokenize::{Token, tokenize};
//!
//! let tokens = tokenize("Hello, world!").unwrap();
//! assert_eq!(
//!     tokens,
//!     vec![
//!         Token::Word("Hello".to_string()),
//!         Token::Punctuation(','),
//!         Token::Word("world".to_string()),
//!         Token::Punctuation('!'),
//!     ]
//! );
//! ```

use std::fmt;

use crate::marker;
use crate::{LacunaError, Result};

/// Punctuation signs split off the end of a chunk.
pub const PUNCTUATION_SIGNS: [char; 8] = ['.', '?', '!', ',', ';', ':', '\'', '"'];

/// A single unit of a tokenized paragraph.
///
/// `Marker` only appears after random sampling replaced a token; it carries
/// the removal-slot key of the word that stood there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Word(String),
    Punctuation(char),
    Marker(usize),
}

impl Token {
    /// Returns true if this token is a removal marker.
    pub fn is_marker(&self) -> bool {
        matches!(self, Token::Marker(_))
    }

    /// Returns true if this token is a single punctuation sign.
    pub fn is_punctuation(&self) -> bool {
        matches!(self, Token::Punctuation(_))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(word) => f.write_str(word),
            Token::Punctuation(sign) => write!(f, "{}", sign),
            Token::Marker(key) => f.write_str(&marker::encode(*key)),
        }
    }
}

/// Checks whether a character is one of the supported punctuation signs.
pub fn is_punctuation_sign(c: char) -> bool {
    PUNCTUATION_SIGNS.contains(&c)
}

/// Splits text into word and punctuation tokens.
///
/// # Errors
///
/// Returns [`LacunaError::InvalidArgument`] if `text` is empty. Whitespace-only
/// text is valid and yields no tokens.
pub fn tokenize(text: &str) -> Result<Vec<Token>> {
    if text.is_empty() {
        return Err(LacunaError::InvalidArgument("cannot tokenize empty text".to_string()));
    }

    let mut tokens = Vec::new();
    for chunk in text.split_whitespace() {
        match chunk.char_indices().next_back() {
            Some((idx, last)) if is_punctuation_sign(last) => {
                let word = &chunk[..idx];
                if !word.is_empty() {
                    tokens.push(Token::Word(word.to_string()));
                }
                tokens.push(Token::Punctuation(last));
            }
            _ => tokens.push(Token::Word(chunk.to_string())),
        }
    }

    Ok(tokens)
}

/// Joins tokens back into text with single spaces.
pub fn join_tokens(tokens: &[Token]) -> String {
    tokens.iter().map(Token::to_string).collect::<Vec<_>>().join(" ")
}
