//! Word classes and per-language lookup tables.
//!
//! A [`LookupTable`] is an ordered word list for one (word class, language)
//! pair; the key of a word is its position in the list. [`LookupTables`]
//! holds every table plus the set of supported languages and is shared
//! read-only once loaded.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::LacunaError;

/// The class of words removed from a page.
///
/// # Example
///
/// ```rust
/// use lacuna_core::WordClass;
///
/// let class: WordClass = "Articles".parse().unwrap();
/// assert_eq!(class, WordClass::Articles);
/// assert!("adverbs".parse::<WordClass>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordClass {
    Articles,
    Prepositions,
    Pronouns,
    Random,
}

impl WordClass {
    /// Classes that are backed by lookup tables.
    pub const LOOKUP: [WordClass; 3] = [WordClass::Articles, WordClass::Prepositions, WordClass::Pronouns];

    /// Lowercase name, also used as the table file prefix.
    pub fn name(self) -> &'static str {
        match self {
            WordClass::Articles => "articles",
            WordClass::Prepositions => "prepositions",
            WordClass::Pronouns => "pronouns",
            WordClass::Random => "random",
        }
    }

    /// Returns true for classes removed by table lookup.
    pub fn is_lookup(self) -> bool {
        !matches!(self, WordClass::Random)
    }
}

impl fmt::Display for WordClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WordClass {
    type Err = LacunaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "articles" => Ok(WordClass::Articles),
            "prepositions" => Ok(WordClass::Prepositions),
            "pronouns" => Ok(WordClass::Pronouns),
            "random" => Ok(WordClass::Random),
            _ => Err(LacunaError::InvalidArgument(format!(
                "unknown word class: {:?} (expected articles, prepositions, pronouns or random)",
                s
            ))),
        }
    }
}

/// Ordered word list for one word class of one language.
///
/// Keys are dense and start at 0: the key of a word is its line number in
/// the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LookupTable {
    words: Vec<String>,
}

impl LookupTable {
    pub fn new(words: Vec<String>) -> Self {
        Self { words }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Returns the word stored under `key`.
    pub fn get(&self, key: usize) -> Option<&str> {
        self.words.get(key).map(String::as_str)
    }

    /// Iterates `(key, word)` pairs in key order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &str)> {
        self.words.iter().map(String::as_str).enumerate()
    }

    /// Returns true if any entry equals `word` exactly.
    pub fn is_member(&self, word: &str) -> bool {
        self.words.iter().any(|entry| entry == word)
    }

    /// Returns every key whose entry equals `word` exactly, in key order.
    ///
    /// Duplicate entries in the configuration yield several keys.
    pub fn matching_keys(&self, word: &str) -> Vec<usize> {
        self.entries()
            .filter(|(_, entry)| *entry == word)
            .map(|(key, _)| key)
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for LookupTable {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self { words: iter.into_iter().map(Into::into).collect() }
    }
}

/// All lookup tables and the supported languages.
///
/// # Example
///
/// ```rust
/// use lacuna_core::{LookupTable, LookupTables, WordClass};
///
/// let mut tables = LookupTables::with_languages(["en"]);
/// tables.insert(WordClass::Articles, "en", ["the", "a", "an"].into_iter().collect());
///
/// assert!(tables.is_language_supported("en"));
/// assert!(!tables.is_language_supported("da"));
/// assert_eq!(tables.matching_keys(WordClass::Articles, "en", "an"), vec![2]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LookupTables {
    languages: BTreeSet<String>,
    tables: HashMap<(WordClass, String), LookupTable>,
}

impl LookupTables {
    /// Creates an empty set of tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty set of tables for the given languages.
    pub fn with_languages<I, S>(languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { languages: languages.into_iter().map(Into::into).collect(), tables: HashMap::new() }
    }

    /// Adds a supported language.
    pub fn add_language(&mut self, language: impl Into<String>) {
        self.languages.insert(language.into());
    }

    /// Adds or replaces the table for a word class and language.
    pub fn insert(&mut self, class: WordClass, language: impl Into<String>, table: LookupTable) {
        self.tables.insert((class, language.into()), table);
    }

    /// Checks if a language code is listed as supported.
    pub fn is_language_supported(&self, language: &str) -> bool {
        self.languages.contains(language)
    }

    /// Supported language codes in sorted order.
    pub fn supported_languages(&self) -> impl Iterator<Item = &str> {
        self.languages.iter().map(String::as_str)
    }

    /// Returns the table for a word class and language.
    ///
    /// Always `None` for [`WordClass::Random`].
    pub fn table(&self, class: WordClass, language: &str) -> Option<&LookupTable> {
        self.tables.get(&(class, language.to_string()))
    }

    /// Checks if `word` is in the table for a class and language.
    ///
    /// A missing table means nothing is removable.
    pub fn is_member(&self, class: WordClass, language: &str, word: &str) -> bool {
        self.table(class, language).is_some_and(|table| table.is_member(word))
    }

    /// Keys matching `word` in the table for a class and language.
    pub fn matching_keys(&self, class: WordClass, language: &str, word: &str) -> Vec<usize> {
        self.table(class, language)
            .map(|table| table.matching_keys(word))
            .unwrap_or_default()
    }

    /// Number of loaded tables.
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}
