//! HTML parsing and paragraph rewriting.
//!
//! The title comes from a scraper [`Document`]. Paragraphs are read and
//! rewritten with lol_html, and both passes count `<p>` elements with the
//! same paragraph stack, so position `n` always names the same paragraph.
//! Markup outside the rewritten paragraphs is kept byte for byte.
//!
//! A paragraph is only rewritten when an end tag closes it. HTML5 lets
//! authors leave `</p>` out; such paragraphs are read but left untouched.
//!
//! # Example
//!
//! ```rust
//! use lacuna_core::document::Document;
//!
//! let html = r#"
//!     <html>
//!         <head><title>Title</title></head>
//!         <body><p>First   <b>paragraph</b></p><p></p></body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html);
//! assert_eq!(doc.title(), Some("Title".to_string()));
//! assert_eq!(doc.paragraph_texts().unwrap(), vec!["First paragraph".to_string(), String::new()]);
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::LazyLock;

use lol_html::html_content::ContentType;
use lol_html::{HtmlRewriter, Settings, doc_text, element, end_tag};
use regex::Regex;
use scraper::{Html, Selector};

use crate::{LacunaError, Result};

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Represents a parsed HTML document.
pub struct Document {
    source: String,
    html: Html,
}

impl Document {
    /// Parses HTML from a string.
    pub fn parse(html: &str) -> Self {
        Self { source: html.to_string(), html: Html::parse_document(html) }
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`LacunaError::HtmlParseError`] if the selector is invalid.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel =
            Selector::parse(selector).map_err(|e| LacunaError::HtmlParseError(format!("Invalid selector: {}", e)))?;

        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Gets the title of the document.
    ///
    /// Returns the content of the `<title>` element if present.
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|el| normalize_whitespace(&el.text().collect::<String>()))
    }

    /// Every `<p>` element in document order. See [`read_paragraphs`].
    pub fn paragraphs(&self) -> Result<Vec<Paragraph>> {
        read_paragraphs(&self.source)
    }

    /// Text of every `<p>` element in document order.
    ///
    /// Paragraphs without text yield an empty string so positions line up
    /// with [`rewrite_page`].
    pub fn paragraph_texts(&self) -> Result<Vec<String>> {
        Ok(self.paragraphs()?.into_iter().map(|p| p.text).collect())
    }
}

/// A wrapper around scraper's ElementRef.
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: scraper::ElementRef<'a>,
}

impl Element<'_> {
    /// Gets the whitespace-normalized text content of this element.
    pub fn text(&self) -> String {
        normalize_whitespace(&self.element.text().collect::<String>())
    }

    /// Gets the value of an attribute.
    ///
    /// Returns `None` if the attribute is not present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.element.value().attr(name)
    }
}

/// Collapses whitespace runs to single spaces and trims.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// A `<p>` element as read from the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    /// Whitespace-normalized text with entities decoded.
    pub text: String,
    /// An end tag closed the paragraph, so it can be rewritten.
    pub closed: bool,
}

/// Open `<p>` elements while streaming a page.
///
/// Text belongs to the innermost open paragraph. lol_html runs the end tag
/// handler of a paragraph when an end tag pops it off its element stack; a
/// paragraph still open when the document ends never gets one.
#[derive(Debug, Default)]
struct ParagraphStack {
    open: Vec<usize>,
    closed: Vec<bool>,
}

impl ParagraphStack {
    fn open(&mut self) -> usize {
        let index = self.closed.len();
        self.closed.push(false);
        self.open.push(index);
        index
    }

    fn close(&mut self, index: usize) {
        if let Some(closed) = self.closed.get_mut(index) {
            *closed = true;
        }
        self.pop(index);
    }

    fn pop(&mut self, index: usize) {
        if let Some(pos) = self.open.iter().rposition(|&i| i == index) {
            self.open.truncate(pos);
        }
    }

    fn innermost(&self) -> Option<usize> {
        self.open.last().copied()
    }
}

#[derive(Debug, Default)]
struct ReadState {
    stack: ParagraphStack,
    raw: Vec<String>,
}

/// Reads every `<p>` element in document order.
///
/// Whitespace runs are collapsed to single spaces and the text is trimmed.
/// Paragraphs are counted exactly as [`rewrite_page`] counts them.
///
/// # Errors
///
/// Returns [`LacunaError::HtmlParseError`] if lol_html rejects the input.
pub fn read_paragraphs(html: &str) -> Result<Vec<Paragraph>> {
    let state = Rc::new(RefCell::new(ReadState::default()));

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![element!("*", |el| {
                if !el.tag_name().eq_ignore_ascii_case("p") {
                    return Ok(());
                }

                let index = {
                    let mut state = state.borrow_mut();
                    state.raw.push(String::new());
                    state.stack.open()
                };

                if el.can_have_content() {
                    let state = Rc::clone(&state);
                    el.on_end_tag(end_tag!(move |_| {
                        state.borrow_mut().stack.close(index);
                        Ok(())
                    }))?;
                } else {
                    state.borrow_mut().stack.pop(index);
                }
                Ok(())
            })],
            document_content_handlers: vec![doc_text!(|t| {
                let mut state = state.borrow_mut();
                if let Some(index) = state.stack.innermost()
                    && let Some(raw) = state.raw.get_mut(index)
                {
                    raw.push_str(t.as_str());
                }
                Ok(())
            })],
            ..Default::default()
        },
        |_: &[u8]| {},
    );

    rewriter
        .write(html.as_bytes())
        .map_err(|e| LacunaError::HtmlParseError(e.to_string()))?;
    rewriter.end().map_err(|e| LacunaError::HtmlParseError(e.to_string()))?;

    let state = state.borrow();
    Ok(state
        .raw
        .iter()
        .zip(&state.stack.closed)
        .map(|(raw, &closed)| Paragraph { text: decode_text(raw), closed })
        .collect())
}

/// Decodes character references in raw text and normalizes whitespace.
fn decode_text(raw: &str) -> String {
    if raw.contains('&') {
        let fragment = Html::parse_fragment(raw);
        normalize_whitespace(&fragment.root_element().text().collect::<String>())
    } else {
        normalize_whitespace(raw)
    }
}

/// Page-level changes applied while rewriting.
#[derive(Debug, Clone, Default)]
pub struct PageAssets {
    /// Origin prepended to root-relative stylesheet links.
    pub stylesheet_origin: Option<String>,
    /// Stylesheet links appended to `<head>`.
    pub stylesheets: Vec<String>,
    /// Scripts appended to `<body>`.
    pub scripts: Vec<String>,
}

/// Rewrites a page with new paragraph contents.
///
/// `paragraphs[n]` replaces the content of the n-th `<p>` element when it
/// is `Some`; `None` and positions past the end leave the paragraph as is.
/// Paragraphs that no end tag closes are never replaced. The new content
/// is written in front of the end tag after the old text and inline tags
/// have been dropped.
///
/// # Errors
///
/// Returns [`LacunaError::HtmlParseError`] if lol_html rejects the input and
/// [`LacunaError::InvalidEncoding`] if the output is not valid UTF-8.
pub fn rewrite_page(html: &str, paragraphs: &[Option<String>], assets: &PageAssets) -> Result<String> {
    let targets: Vec<Option<&str>> = read_paragraphs(html)?
        .iter()
        .zip(paragraphs.iter().map(Option::as_deref).chain(std::iter::repeat(None)))
        .map(|(paragraph, content)| content.filter(|_| paragraph.closed))
        .collect();
    let is_target = |index: Option<usize>| index.and_then(|i| targets.get(i)).is_some_and(Option::is_some);

    let stack = Rc::new(RefCell::new(ParagraphStack::default()));
    let mut output = Vec::with_capacity(html.len());

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![
                element!("*", |el| {
                    if !el.tag_name().eq_ignore_ascii_case("p") {
                        if is_target(stack.borrow().innermost()) {
                            el.remove_and_keep_content();
                        }
                        return Ok(());
                    }

                    let index = stack.borrow_mut().open();
                    if el.can_have_content() {
                        let content = targets.get(index).copied().flatten().map(str::to_string);
                        let stack = Rc::clone(&stack);
                        el.on_end_tag(end_tag!(move |end| {
                            if let Some(content) = &content {
                                end.before(content, ContentType::Html);
                            }
                            stack.borrow_mut().close(index);
                            Ok(())
                        }))?;
                    } else {
                        stack.borrow_mut().pop(index);
                    }
                    Ok(())
                }),
                element!("link[rel='stylesheet']", |el| {
                    if let Some(origin) = &assets.stylesheet_origin
                        && let Some(href) = el.get_attribute("href")
                        && href.starts_with('/')
                        && !href.starts_with("//")
                    {
                        el.set_attribute("href", &format!("{}{}", origin, href))?;
                    }
                    Ok(())
                }),
                element!("head", |el| {
                    for href in &assets.stylesheets {
                        el.append(&format!(r#"<link rel="stylesheet" href="{}">"#, href), ContentType::Html);
                    }
                    Ok(())
                }),
                element!("body", |el| {
                    for src in &assets.scripts {
                        el.append(&format!(r#"<script src="{}"></script>"#, src), ContentType::Html);
                    }
                    Ok(())
                }),
            ],
            document_content_handlers: vec![doc_text!(|t| {
                if is_target(stack.borrow().innermost()) {
                    t.remove();
                }
                Ok(())
            })],
            ..Default::default()
        },
        |c: &[u8]| output.extend_from_slice(c),
    );

    rewriter
        .write(html.as_bytes())
        .map_err(|e| LacunaError::HtmlParseError(e.to_string()))?;
    rewriter.end().map_err(|e| LacunaError::HtmlParseError(e.to_string()))?;

    String::from_utf8(output).map_err(|_| LacunaError::InvalidEncoding)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Test   Page</title>
    <link rel="stylesheet" href="/w/load.php?modules=site.styles">
    <link rel="stylesheet" href="https://cdn.example.com/a.css">
</head>
<body>
    <h1>Heading</h1>
    <p>The   first <a href="/wiki/Paragraph">paragraph</a>.</p>
    <p>  </p>
    <p>Another one</p>
</body>
</html>"#;

    #[test]
    fn test_title() {
        let doc = Document::parse(SAMPLE_HTML);
        assert_eq!(doc.title(), Some("Test Page".to_string()));
    }

    #[test]
    fn test_paragraph_texts() {
        let doc = Document::parse(SAMPLE_HTML);
        assert_eq!(
            doc.paragraph_texts().unwrap(),
            vec!["The first paragraph.".to_string(), String::new(), "Another one".to_string()]
        );
    }

    #[test]
    fn test_invalid_selector() {
        let doc = Document::parse(SAMPLE_HTML);
        assert!(matches!(doc.select("[[invalid"), Err(LacunaError::HtmlParseError(_))));
    }

    #[test]
    fn test_element_attr() {
        let doc = Document::parse(SAMPLE_HTML);
        let links = doc.select("a").unwrap();
        assert_eq!(links[0].attr("href"), Some("/wiki/Paragraph"));
    }

    #[test]
    fn test_rewrite_paragraphs_by_position() {
        let rewritten = rewrite_page(
            SAMPLE_HTML,
            &[Some("<em>new</em>".to_string()), None],
            &PageAssets::default(),
        )
        .unwrap();

        assert!(rewritten.contains("<p><em>new</em></p>"));
        assert!(!rewritten.contains("first"));
        assert!(rewritten.contains("<p>  </p>"));
        assert!(rewritten.contains("<p>Another one</p>"));
        assert!(rewritten.contains("<h1>Heading</h1>"));
    }

    #[test]
    fn test_rewrite_assets() {
        let assets = PageAssets {
            stylesheet_origin: Some("https://en.wikipedia.org".to_string()),
            stylesheets: vec!["stylesheets/wiki.css".to_string()],
            scripts: vec!["javascripts/main.js".to_string()],
        };
        let rewritten = rewrite_page(SAMPLE_HTML, &[], &assets).unwrap();

        assert!(rewritten.contains(r#"href="https://en.wikipedia.org/w/load.php?modules=site.styles""#));
        assert!(rewritten.contains(r#"href="https://cdn.example.com/a.css""#));
        assert!(rewritten.contains(r#"<link rel="stylesheet" href="stylesheets/wiki.css"></head>"#));
        assert!(rewritten.contains(r#"<script src="javascripts/main.js"></script></body>"#));
    }

    #[test]
    fn test_rewrite_keeps_multibyte_text() {
        let html = "<html><body><p>Straße</p><div>über Köln</div></body></html>";
        let rewritten = rewrite_page(html, &[Some("Gasse".to_string())], &PageAssets::default()).unwrap();
        assert_eq!(rewritten, "<html><body><p>Gasse</p><div>über Köln</div></body></html>");
    }

    #[test]
    fn test_read_paragraphs_decodes_entities() {
        let paragraphs = read_paragraphs("<p>Tom &amp; Jerry&nbsp;&lt;3</p>").unwrap();
        assert_eq!(paragraphs[0].text, "Tom & Jerry <3");
        assert!(paragraphs[0].closed);
    }

    #[test]
    fn test_read_paragraphs_block_inside_paragraph() {
        let html = "<p>Hello <div>box</div> world</p><p>the cat</p><p>a dog</p>";
        let texts: Vec<String> = read_paragraphs(html).unwrap().into_iter().map(|p| p.text).collect();
        assert_eq!(texts, vec!["Hello box world", "the cat", "a dog"]);
    }

    #[test]
    fn test_rewrite_block_inside_paragraph_keeps_alignment() {
        let html = "<html><body><p>Hello <div>box</div> world</p><p>the cat</p><p>a dog</p></body></html>";
        let rewritten = rewrite_page(
            html,
            &[Some("one".to_string()), None, Some("three".to_string())],
            &PageAssets::default(),
        )
        .unwrap();

        assert_eq!(rewritten, "<html><body><p>one</p><p>the cat</p><p>three</p></body></html>");
    }

    #[test]
    fn test_read_paragraphs_missing_end_tag() {
        let paragraphs = read_paragraphs("<p>the one<p>a two</p><p>the three</p>").unwrap();

        assert_eq!(paragraphs.len(), 3);
        assert!(!paragraphs[0].closed);
        assert_eq!(paragraphs[1], Paragraph { text: "a two".to_string(), closed: true });
        assert_eq!(paragraphs[2], Paragraph { text: "the three".to_string(), closed: true });
    }

    #[test]
    fn test_rewrite_skips_paragraph_without_end_tag() {
        let html = "<html><body><p>the one<p>a two</p><p>the three</p></body></html>";
        let rewritten = rewrite_page(
            html,
            &[Some("1".to_string()), Some("2".to_string()), Some("3".to_string())],
            &PageAssets { scripts: vec!["main.js".to_string()], ..Default::default() },
        )
        .unwrap();

        assert_eq!(
            rewritten,
            r#"<html><body><p>the one<p>2</p><p>3</p><script src="main.js"></script></body></html>"#
        );
    }

    #[test]
    fn test_rewrite_drops_inline_markup() {
        let html = r#"<p>The <a href="/wiki/X">first</a><br>line</p>"#;
        let rewritten = rewrite_page(html, &[Some("<span>x</span>".to_string())], &PageAssets::default()).unwrap();
        assert_eq!(rewritten, "<p><span>x</span></p>");
    }
}
