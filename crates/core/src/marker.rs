//! Inline removal markers.
//!
//! A removed word is written into the transformed text as the placeholder
//! sentinel followed by its key in angle brackets, e.g. `##<3>`. The rebuild
//! stage splits the text on the sentinel to find those positions again.
//!
//! Source text is assumed never to contain the sentinel literally.

/// Placeholder sentinel that starts every marker.
pub const PLACEHOLDER: &str = "##";

/// Opening bracket around the marker key.
pub const MARKER_OPEN: char = '<';

/// Closing bracket around the marker key.
pub const MARKER_CLOSE: char = '>';

/// A piece of decoded text.
///
/// `key` is set when the piece started with a marker; `text` is the plain
/// text that followed it (or the whole piece when there was no marker).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub key: Option<usize>,
    pub text: String,
}

impl Segment {
    fn plain(text: &str) -> Self {
        Self { key: None, text: text.to_string() }
    }
}

/// Encodes a key as an inline marker.
///
/// # Example
///
/// ```rust
/// assert_eq!(lacuna_core::marker::encode(3), "##<3>");
/// ```
pub fn encode(key: usize) -> String {
    format!("{}{}{}{}", PLACEHOLDER, MARKER_OPEN, key, MARKER_CLOSE)
}

/// Splits marked text into plain segments and marker positions.
///
/// Empty pieces are dropped. A piece whose bracketed key is missing or not a
/// number is kept as plain text.
///
/// # Example
///
/// ```rust
/// use lacuna_core::marker::{Segment, decode};
///
/// let segments = decode("the ##<0> cat");
/// assert_eq!(segments[0], Segment { key: None, text: "the ".to_string() });
/// assert_eq!(segments[1], Segment { key: Some(0), text: " cat".to_string() });
/// ```
pub fn decode(marked: &str) -> Vec<Segment> {
    marked
        .split(PLACEHOLDER)
        .filter(|piece| !piece.is_empty())
        .map(decode_piece)
        .collect()
}

fn decode_piece(piece: &str) -> Segment {
    let Some(rest) = piece.strip_prefix(MARKER_OPEN) else {
        return Segment::plain(piece);
    };
    let Some((digits, text)) = rest.split_once(MARKER_CLOSE) else {
        return Segment::plain(piece);
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Segment::plain(piece);
    }

    match digits.parse::<usize>() {
        Ok(key) => Segment { key: Some(key), text: text.to_string() },
        Err(_) => Segment::plain(piece),
    }
}
