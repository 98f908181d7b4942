//! Paragraph transformation.
//!
//! [`ClozeTransformer`] turns the plain text of one paragraph into marked
//! text, where every removed word is replaced by an inline marker, together
//! with the selector widget offered at those markers.

use rand::Rng;

use crate::lookup::{LookupTables, WordClass};
use crate::marker;
use crate::sampler;
use crate::session::TransformSession;
use crate::tokenize::{join_tokens, tokenize};
use crate::widget::SelectorWidget;
use crate::{LacunaError, Result};

/// Result of transforming one paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    /// Paragraph text with removed words replaced by markers.
    pub marked: String,
    /// Widget shared by every marker of the paragraph.
    pub widget: SelectorWidget,
}

/// Removes words of the session's word class from paragraph text.
///
/// # Example
///
/// ```rust
/// use lacuna_core::{ClozeTransformer, LookupTables, TransformSession, WordClass};
///
/// let mut tables = LookupTables::with_languages(["en"]);
/// tables.insert(WordClass::Articles, "en", ["the", "a"].into_iter().collect());
/// let session = TransformSession::new("en", WordClass::Articles).unwrap();
///
/// let transformer = ClozeTransformer::new(&tables, &session);
/// let out = transformer.transform("a cat on the  mat", &mut rand::rng()).unwrap();
/// assert_eq!(out.marked, "##<1> cat on ##<0> mat");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ClozeTransformer<'a> {
    tables: &'a LookupTables,
    session: &'a TransformSession,
}

impl<'a> ClozeTransformer<'a> {
    pub fn new(tables: &'a LookupTables, session: &'a TransformSession) -> Self {
        Self { tables, session }
    }

    pub fn session(&self) -> &TransformSession {
        self.session
    }

    /// Transforms one paragraph.
    ///
    /// The random source is only consulted for [`WordClass::Random`].
    ///
    /// # Errors
    ///
    /// Returns [`LacunaError::InvalidArgument`] if `text` is empty.
    pub fn transform<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> Result<Transformed> {
        if text.is_empty() {
            return Err(LacunaError::InvalidArgument("paragraph text is empty".to_string()));
        }

        match self.session.word_class() {
            WordClass::Random => self.transform_random(text, rng),
            class => Ok(self.transform_lookup(class, text)),
        }
    }

    /// Widget offered in lookup mode: the whole table for the session.
    pub fn lookup_widget(&self, class: WordClass) -> SelectorWidget {
        self.tables
            .table(class, self.session.language())
            .map(SelectorWidget::from_table)
            .unwrap_or_default()
    }

    fn transform_lookup(&self, class: WordClass, text: &str) -> Transformed {
        let language = self.session.language();
        let marked = text
            .split_whitespace()
            .map(|word| {
                let keys = self.tables.matching_keys(class, language, word);
                if keys.is_empty() {
                    word.to_string()
                } else {
                    keys.into_iter().map(marker::encode).collect()
                }
            })
            .collect::<Vec<_>>()
            .join(" ");

        Transformed { marked, widget: self.lookup_widget(class) }
    }

    fn transform_random<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> Result<Transformed> {
        let mut tokens = tokenize(text)?;
        let removed = sampler::sample(&mut tokens, rng);

        Ok(Transformed { marked: join_tokens(&tokens), widget: SelectorWidget::from_removals(&removed) })
    }
}
