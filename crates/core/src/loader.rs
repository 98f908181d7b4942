//! Lookup-table loading from a configuration directory.
//!
//! The directory holds a `supported_languages` file with one language code
//! per line, and one word list per word class and language named
//! `<class>_<language>`, e.g. `articles_en`. Each line of a word list is one
//! entry; its zero-based line number is the entry key.

use std::collections::BTreeSet;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::lookup::{LookupTable, LookupTables, WordClass};
use crate::{LacunaError, Result};

/// Name of the file listing the supported languages.
pub const SUPPORTED_LANGUAGES_FILE: &str = "supported_languages";

/// Separator between word class and language in table file names.
pub const FILE_NAME_SEPARATOR: char = '_';

/// Environment variable overriding the default table directory.
pub const TABLES_ENV_VAR: &str = "LACUNA_TABLES";

/// Loader for the lookup-table directory.
#[derive(Debug, Clone)]
pub struct TableLoader {
    dir: PathBuf,
}

impl TableLoader {
    /// Create a loader for a table directory
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self { dir: dir.as_ref().to_path_buf() }
    }

    /// Directory the tables are read from
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load the supported languages and every table for them.
    ///
    /// # Errors
    ///
    /// Fails if the directory does not exist, is not a directory, has no
    /// `supported_languages` file, or a file cannot be read.
    pub fn load(&self) -> Result<LookupTables> {
        if !self.dir.exists() {
            return Err(LacunaError::ConfigError(format!(
                "table directory {} does not exist",
                self.dir.display()
            )));
        }
        if !self.dir.is_dir() {
            return Err(LacunaError::ConfigError(format!("{} is not a directory", self.dir.display())));
        }

        let languages = Self::read_languages(self.dir.join(SUPPORTED_LANGUAGES_FILE))?;
        let mut tables = LookupTables::with_languages(languages);

        let mut entries = fs::read_dir(&self.dir)?.collect::<std::io::Result<Vec<_>>>()?;
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some((class, language)) = parse_table_name(name) else {
                tracing::debug!(file = %path.display(), "skipping file that is not a lookup table");
                continue;
            };
            if !tables.is_language_supported(language) {
                tracing::debug!(file = %path.display(), language, "skipping table for unsupported language");
                continue;
            }

            let table = Self::read_table(&path)?;
            tracing::debug!(class = %class, language, entries = table.len(), "loaded lookup table");
            tables.insert(class, language, table);
        }

        tracing::info!(
            dir = %self.dir.display(),
            languages = tables.supported_languages().count(),
            tables = tables.table_count(),
            "lookup tables loaded"
        );

        Ok(tables)
    }

    /// Read the supported-languages file
    fn read_languages(path: PathBuf) -> Result<BTreeSet<String>> {
        if !path.exists() {
            return Err(LacunaError::FileNotFound(path));
        }
        let file = fs::File::open(&path)?;
        parse_languages(BufReader::new(file))
    }

    /// Read one word list
    fn read_table(path: &Path) -> Result<LookupTable> {
        let file = fs::File::open(path)?;
        parse_table(BufReader::new(file))
    }
}

impl Default for TableLoader {
    fn default() -> Self {
        TableLoaderBuilder::new().build()
    }
}

/// Builder for TableLoader
#[derive(Debug, Default)]
pub struct TableLoaderBuilder {
    dir: Option<PathBuf>,
}

impl TableLoaderBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self { dir: None }
    }

    /// Set the table directory
    pub fn dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Build the TableLoader, falling back to the default directory
    pub fn build(self) -> TableLoader {
        TableLoader { dir: self.dir.unwrap_or_else(default_dir) }
    }
}

/// Default table directory.
///
/// Checks `LACUNA_TABLES`, then `~/.config/lacuna/tables`, then `./tables`.
pub fn default_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(TABLES_ENV_VAR) {
        return PathBuf::from(dir);
    }

    if let Some(home_dir) = dirs::home_dir() {
        let config_dir = home_dir.join(".config").join("lacuna").join("tables");
        if config_dir.is_dir() {
            return config_dir;
        }
    }

    PathBuf::from("tables")
}

/// Split a table file name into word class and language.
///
/// Names must have exactly two `_`-separated parts and a known lookup class.
pub fn parse_table_name(name: &str) -> Option<(WordClass, &str)> {
    let mut parts = name.split(FILE_NAME_SEPARATOR);
    let (class, language) = (parts.next()?, parts.next()?);
    if parts.next().is_some() || language.is_empty() {
        return None;
    }

    let class = match class {
        "articles" => WordClass::Articles,
        "prepositions" => WordClass::Prepositions,
        "pronouns" => WordClass::Pronouns,
        _ => return None,
    };
    Some((class, language))
}

/// Parse a supported-languages list; blank lines are ignored.
pub fn parse_languages<R: BufRead>(reader: R) -> Result<BTreeSet<String>> {
    let mut languages = BTreeSet::new();
    for line in reader.lines() {
        let line = line?;
        let code = line.trim();
        if !code.is_empty() {
            languages.insert(code.to_string());
        }
    }
    Ok(languages)
}

/// Parse a word list; blank lines are kept as empty entries.
pub fn parse_table<R: BufRead>(reader: R) -> Result<LookupTable> {
    let mut words = Vec::new();
    for line in reader.lines() {
        words.push(line?.trim().to_string());
    }
    Ok(LookupTable::new(words))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn write_fixture(dir: &Path) {
        fs::write(dir.join(SUPPORTED_LANGUAGES_FILE), "de\nen\n").unwrap();
        fs::write(dir.join("articles_de"), "der\ndie\ndas\n").unwrap();
        fs::write(dir.join("articles_en"), "the\na\n").unwrap();
        fs::write(dir.join("prepositions_de"), "an\nauf\n").unwrap();
        fs::write(dir.join("prepositions_en"), "about\nabove\n").unwrap();
        fs::write(dir.join("pronouns_de"), "ich\ndu\n").unwrap();
        fs::write(dir.join("pronouns_en"), "I\nyou\n").unwrap();
    }

    #[test]
    fn test_parse_table_name() {
        assert_eq!(parse_table_name("articles_en"), Some((WordClass::Articles, "en")));
        assert_eq!(parse_table_name("prepositions_de"), Some((WordClass::Prepositions, "de")));
        assert_eq!(parse_table_name("pronouns_fr"), Some((WordClass::Pronouns, "fr")));
        assert_eq!(parse_table_name("supported_languages"), None);
        assert_eq!(parse_table_name("random_en"), None);
        assert_eq!(parse_table_name("articles_en_old"), None);
        assert_eq!(parse_table_name("articles"), None);
        assert_eq!(parse_table_name("articles_"), None);
    }

    #[test]
    fn test_parse_table_keeps_blank_lines() {
        let table = parse_table(Cursor::new("  der \n\ndie\n")).unwrap();
        let entries: Vec<_> = table.entries().collect();
        assert_eq!(entries, vec![(0, "der"), (1, ""), (2, "die")]);
    }

    #[test]
    fn test_parse_languages_skips_blank_lines() {
        let languages = parse_languages(Cursor::new("de\n\n en \n")).unwrap();
        assert_eq!(languages.into_iter().collect::<Vec<_>>(), vec!["de", "en"]);
    }

    #[test]
    fn test_load_tables() {
        let temp_dir = TempDir::new().unwrap();
        write_fixture(temp_dir.path());

        let tables = TableLoaderBuilder::new().dir(temp_dir.path()).build().load().unwrap();

        assert_eq!(tables.supported_languages().collect::<Vec<_>>(), vec!["de", "en"]);
        assert_eq!(tables.table_count(), 6);

        let articles_de: Vec<_> = tables.table(WordClass::Articles, "de").unwrap().entries().collect();
        assert_eq!(articles_de, vec![(0, "der"), (1, "die"), (2, "das")]);

        let prepositions_en: Vec<_> = tables.table(WordClass::Prepositions, "en").unwrap().entries().collect();
        assert_eq!(prepositions_en, vec![(0, "about"), (1, "above")]);

        let pronouns_en: Vec<_> = tables.table(WordClass::Pronouns, "en").unwrap().entries().collect();
        assert_eq!(pronouns_en, vec![(0, "I"), (1, "you")]);
    }

    #[test]
    fn test_load_skips_unsupported_and_foreign_files() {
        let temp_dir = TempDir::new().unwrap();
        write_fixture(temp_dir.path());
        fs::write(temp_dir.path().join("articles_da"), "den\ndet\n").unwrap();
        fs::write(temp_dir.path().join("README"), "notes\n").unwrap();
        fs::create_dir(temp_dir.path().join("articles_xx")).unwrap();

        let tables = TableLoader::new(temp_dir.path()).load().unwrap();

        assert!(tables.table(WordClass::Articles, "da").is_none());
        assert_eq!(tables.table_count(), 6);
    }

    #[test]
    fn test_load_missing_dir() {
        let result = TableLoader::new("/nonexistent/lacuna/tables").load();
        assert!(matches!(result, Err(LacunaError::ConfigError(_))));
    }

    #[test]
    fn test_load_file_instead_of_dir() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("tables");
        fs::write(&file, "en\n").unwrap();

        let result = TableLoader::new(&file).load();
        assert!(matches!(result, Err(LacunaError::ConfigError(_))));
    }

    #[test]
    fn test_load_missing_languages_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("articles_en"), "the\n").unwrap();

        let result = TableLoader::new(temp_dir.path()).load();
        assert!(matches!(result, Err(LacunaError::FileNotFound(_))));
    }

    #[test]
    fn test_builder_keeps_dir() {
        let loader = TableLoaderBuilder::new().dir("custom/tables").build();
        assert_eq!(loader.dir(), Path::new("custom/tables"));
    }
}
