pub mod document;
pub mod error;
pub mod exercise;
pub mod fetch;
pub mod lacuna;
pub mod loader;
pub mod lookup;
pub mod marker;
pub mod rebuild;
pub mod sampler;
pub mod session;
pub mod site;
pub mod tokenize;
pub mod transform;
pub mod widget;

pub use document::{Document, PageAssets, Paragraph, read_paragraphs, rewrite_page};
pub use error::{LacunaError, Result};
pub use exercise::{Exercise, ParagraphExercise, build_exercise};
pub use fetch::FetchConfig;
#[cfg(feature = "fetch")]
pub use fetch::fetch_url;
pub use fetch::{fetch_file, fetch_stdin};
pub use lacuna::{Lacuna, LacunaConfig, LacunaConfigBuilder};
pub use loader::{TableLoader, TableLoaderBuilder};
pub use lookup::{LookupTable, LookupTables, WordClass};
pub use rebuild::{Fragment, fragments_to_html, rebuild};
pub use sampler::{RemovalRecord, WORDS_PER_REMOVAL, sample, sample_with};
pub use session::TransformSession;
pub use site::{article_language, extract_language, is_wiki_page, message_page};
pub use tokenize::{Token, join_tokens, tokenize};
pub use transform::{ClozeTransformer, Transformed};
pub use widget::SelectorWidget;
