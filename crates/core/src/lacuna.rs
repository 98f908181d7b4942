//! Main cloze API.
//!
//! [`Lacuna`] owns the lookup tables and turns Wikipedia pages into cloze
//! exercises. The tables are loaded once and shared read-only; each request
//! gets its own [`TransformSession`] and random source.
//!
//! # Example
//!
//! ```rust
//! use lacuna_core::{Lacuna, LookupTables, WordClass};
//!
//! let mut tables = LookupTables::with_languages(["en"]);
//! tables.insert(WordClass::Articles, "en", ["the", "a"].into_iter().collect());
//! let lacuna = Lacuna::new(tables);
//!
//! let session = lacuna
//!     .validate(Some("https://en.wikipedia.org/wiki/Rust"), Some("articles"))
//!     .unwrap();
//! let page = lacuna
//!     .process_html("<html><body><p>the crab</p></body></html>", &session)
//!     .unwrap();
//! assert!(page.contains("<select>"));
//! ```

use std::path::Path;
use std::sync::Arc;

use rand::Rng;

use crate::document::{PageAssets, rewrite_page};
use crate::exercise::{Exercise, build_exercise};
use crate::fetch::FetchConfig;
use crate::loader::TableLoader;
use crate::lookup::{LookupTables, WordClass};
use crate::session::TransformSession;
use crate::site::{article_language, is_wiki_page, message_page, wiki_origin};
use crate::transform::ClozeTransformer;
use crate::{LacunaError, Result};

/// Configuration for [`Lacuna`].
///
/// # Example
///
/// ```rust
/// use lacuna_core::LacunaConfig;
///
/// let config = LacunaConfig::builder()
///     .timeout(10)
///     .stylesheet("/stylesheets/wiki.css")
///     .build();
/// assert_eq!(config.fetch.timeout, 10);
/// ```
#[derive(Debug, Clone)]
pub struct LacunaConfig {
    /// HTTP settings for fetching pages.
    pub fetch: FetchConfig,

    /// Stylesheet link appended to every exercise page (default: `stylesheets/wiki.css`).
    pub stylesheet: String,

    /// Scripts appended to every exercise page, in order.
    pub scripts: Vec<String>,

    /// Whether to point root-relative stylesheet links back at Wikipedia (default: true).
    pub absolutize_stylesheets: bool,
}

impl Default for LacunaConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            stylesheet: "stylesheets/wiki.css".to_string(),
            scripts: vec!["javascripts/main.js".to_string()],
            absolutize_stylesheets: true,
        }
    }
}

impl LacunaConfig {
    /// Creates a new builder for LacunaConfig.
    pub fn builder() -> LacunaConfigBuilder {
        LacunaConfigBuilder::new()
    }
}

/// Builder for LacunaConfig.
pub struct LacunaConfigBuilder {
    config: LacunaConfig,
}

impl LacunaConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: LacunaConfig::default() }
    }

    /// Sets the HTTP timeout in seconds.
    pub fn timeout(mut self, value: u64) -> Self {
        self.config.fetch.timeout = value;
        self
    }

    /// Sets the User-Agent for page requests.
    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.config.fetch.user_agent = value.into();
        self
    }

    /// Sets the exercise stylesheet link.
    pub fn stylesheet(mut self, value: impl Into<String>) -> Self {
        self.config.stylesheet = value.into();
        self
    }

    /// Replaces the exercise scripts.
    pub fn scripts<I, S>(mut self, value: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.scripts = value.into_iter().map(Into::into).collect();
        self
    }

    /// Sets whether root-relative stylesheet links are rewritten.
    pub fn absolutize_stylesheets(mut self, value: bool) -> Self {
        self.config.absolutize_stylesheets = value;
        self
    }

    /// Builds the config.
    pub fn build(self) -> LacunaConfig {
        self.config
    }
}

impl Default for LacunaConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloze exercise generator.
#[derive(Debug, Clone)]
pub struct Lacuna {
    tables: Arc<LookupTables>,
    config: LacunaConfig,
}

impl Lacuna {
    /// Creates a generator with default configuration.
    pub fn new(tables: LookupTables) -> Self {
        Self::with_config(tables, LacunaConfig::default())
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(tables: LookupTables, config: LacunaConfig) -> Self {
        Self { tables: Arc::new(tables), config }
    }

    /// Loads the lookup tables from a directory.
    ///
    /// # Errors
    ///
    /// Fails if the directory or its `supported_languages` file is missing.
    pub fn from_dir<P: AsRef<Path>>(dir: P, config: LacunaConfig) -> Result<Self> {
        let tables = TableLoader::new(dir).load()?;
        Ok(Self::with_config(tables, config))
    }

    pub fn tables(&self) -> &LookupTables {
        &self.tables
    }

    pub fn config(&self) -> &LacunaConfig {
        &self.config
    }

    /// Checks if a language code has lookup tables.
    pub fn is_language_supported(&self, language: &str) -> bool {
        self.tables.is_language_supported(language)
    }

    /// Validates a request and builds its session.
    ///
    /// # Errors
    ///
    /// - [`LacunaError::InvalidArgument`] for a missing or empty URL, a
    ///   missing word class, or an unknown word-class name
    /// - [`LacunaError::NotWikipedia`] for URLs outside Wikipedia, including
    ///   URLs that only mention a Wikipedia host (see [`article_language`])
    /// - [`LacunaError::UnsupportedLanguage`] for languages without tables
    pub fn validate(&self, url: Option<&str>, word_class: Option<&str>) -> Result<TransformSession> {
        let url = url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| LacunaError::InvalidArgument("url is missing".to_string()))?;
        let word_class: WordClass = word_class
            .ok_or_else(|| LacunaError::InvalidArgument("word class is missing".to_string()))?
            .parse()?;

        if !is_wiki_page(url) {
            return Err(LacunaError::NotWikipedia(url.to_string()));
        }

        let language = article_language(url)?;
        if !self.is_language_supported(&language) {
            return Err(LacunaError::UnsupportedLanguage(language));
        }

        TransformSession::new(language, word_class)
    }

    /// Fetches a Wikipedia page and turns it into an exercise page.
    ///
    /// Validation failures never produce an `Err`: they return a message
    /// page the caller can render as is. Only fetch and rewrite failures are
    /// returned as errors.
    #[cfg(feature = "fetch")]
    pub async fn process_site(&self, url: Option<&str>, word_class: Option<&str>) -> Result<String> {
        let session = match self.validate(url, word_class) {
            Ok(session) => session,
            Err(err) => return Self::reject(err),
        };
        let url = url.unwrap_or_default();

        tracing::info!(url, language = session.language(), class = %session.word_class(), "processing page");

        let html = crate::fetch::fetch_url(url, &self.config.fetch).await?;
        self.process_html(&html, &session)
    }

    /// Turns already fetched page HTML into an exercise page.
    pub fn process_html(&self, html: &str, session: &TransformSession) -> Result<String> {
        self.process_html_with_rng(html, session, &mut rand::rng())
    }

    /// Same as [`process_html`](Self::process_html) with an explicit random source.
    pub fn process_html_with_rng<R: Rng + ?Sized>(
        &self,
        html: &str,
        session: &TransformSession,
        rng: &mut R,
    ) -> Result<String> {
        let exercise = self.exercise(html, session, rng)?;
        self.render_page(html, session, &exercise)
    }

    /// Writes a built exercise back into the page it was built from.
    pub fn render_page(&self, html: &str, session: &TransformSession, exercise: &Exercise) -> Result<String> {
        rewrite_page(html, &exercise.paragraph_html(), &self.page_assets(session))
    }

    /// Builds the exercise for a page without rewriting it.
    pub fn exercise<R: Rng + ?Sized>(&self, html: &str, session: &TransformSession, rng: &mut R) -> Result<Exercise> {
        let transformer = ClozeTransformer::new(&self.tables, session);
        build_exercise(html, &transformer, rng)
    }

    /// Message page for a rejected request, or the error itself when it is
    /// not a validation failure.
    pub fn reject(err: LacunaError) -> Result<String> {
        match err.user_message() {
            Some(message) => {
                tracing::warn!(error = %err, "request rejected");
                Ok(message_page(message))
            }
            None => Err(err),
        }
    }

    fn page_assets(&self, session: &TransformSession) -> PageAssets {
        PageAssets {
            stylesheet_origin: self
                .config
                .absolutize_stylesheets
                .then(|| wiki_origin(session.language())),
            stylesheets: vec![self.config.stylesheet.clone()],
            scripts: self.config.scripts.clone(),
        }
    }
}
