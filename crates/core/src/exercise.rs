//! Whole-page exercises.
//!
//! An [`Exercise`] holds the rebuilt fragments of every paragraph of a page,
//! in document order. It is what the page rewriter inserts and what the CLI
//! prints as JSON.

use rand::Rng;
use serde::Serialize;

use crate::document::{Document, Paragraph};
use crate::lookup::WordClass;
use crate::rebuild::{Fragment, fragments_to_html, rebuild};
use crate::transform::ClozeTransformer;
use crate::Result;

/// One paragraph of an exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParagraphExercise {
    /// Whitespace-normalized text of the original paragraph.
    pub original: String,
    /// Rebuilt content; empty when the paragraph had no text.
    pub fragments: Vec<Fragment>,
    /// False when no end tag closes the paragraph. It is then left as is.
    pub rewritable: bool,
}

impl ParagraphExercise {
    /// Inner HTML for the rewritten paragraph, or `None` to leave it as is.
    pub fn to_html(&self) -> Option<String> {
        if !self.rewritable || self.original.is_empty() {
            None
        } else {
            Some(fragments_to_html(&self.fragments))
        }
    }

    pub fn blank_count(&self) -> usize {
        self.fragments.iter().filter(|f| f.is_blank()).count()
    }
}

/// Cloze exercise built from a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exercise {
    pub language: String,
    pub word_class: WordClass,
    pub paragraphs: Vec<ParagraphExercise>,
}

impl Exercise {
    /// Total number of blanks across all paragraphs.
    pub fn blank_count(&self) -> usize {
        self.paragraphs.iter().map(ParagraphExercise::blank_count).sum()
    }

    /// Paragraph rewrites in document order, as expected by
    /// [`rewrite_page`](crate::document::rewrite_page).
    pub fn paragraph_html(&self) -> Vec<Option<String>> {
        self.paragraphs.iter().map(ParagraphExercise::to_html).collect()
    }

    /// Serializes the exercise to JSON.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Builds an exercise from every paragraph of a page.
pub fn build_exercise<R: Rng + ?Sized>(html: &str, transformer: &ClozeTransformer<'_>, rng: &mut R) -> Result<Exercise> {
    let found = Document::parse(html).paragraphs()?;
    let mut paragraphs = Vec::with_capacity(found.len());

    for Paragraph { text: original, closed: rewritable } in found {
        let fragments = if !rewritable || original.is_empty() {
            Vec::new()
        } else {
            let transformed = transformer.transform(&original, rng)?;
            rebuild(&transformed.marked, &transformed.widget)
        };
        paragraphs.push(ParagraphExercise { original, fragments, rewritable });
    }

    let session = transformer.session();
    let exercise = Exercise {
        language: session.language().to_string(),
        word_class: session.word_class(),
        paragraphs,
    };
    tracing::debug!(
        paragraphs = exercise.paragraphs.len(),
        blanks = exercise.blank_count(),
        "exercise built"
    );

    Ok(exercise)
}
