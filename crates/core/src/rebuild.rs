//! Paragraph reconstruction from marked text.
//!
//! The marked text is decoded back into plain runs and marker positions and
//! turned into an ordered list of [`Fragment`]s. The first blank of a
//! paragraph is a bare widget standing where the word was removed; every
//! later blank is wrapped in a position label carrying its marker key.

use serde::Serialize;

use crate::marker;
use crate::widget::{SelectorWidget, escape_html};

/// One piece of a rebuilt paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Fragment {
    /// Plain text, copied through unchanged.
    Text { text: String },
    /// A blank with its selector widget.
    ///
    /// `label` is the marker key shown as the position label; it is `None`
    /// for the first blank of a paragraph. `key` is always the marker key.
    Blank { key: usize, label: Option<usize>, widget: String },
}

impl Fragment {
    /// Renders the fragment as HTML for insertion into a paragraph.
    pub fn to_html(&self) -> String {
        match self {
            Fragment::Text { text } => escape_html(text),
            Fragment::Blank { label: None, widget, .. } => widget.clone(),
            Fragment::Blank { label: Some(label), widget, .. } => {
                format!(r#"<span id="{}">{}</span>"#, label, widget)
            }
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Fragment::Blank { .. })
    }
}

/// Rebuilds a paragraph from marked text and its widget.
///
/// # Example
///
/// ```rust
/// use lacuna_core::{Fragment, LookupTable, SelectorWidget, rebuild};
///
/// let table: LookupTable = ["the", "a"].into_iter().collect();
/// let widget = SelectorWidget::from_table(&table);
/// let fragments = rebuild("##<1> cat and ##<0> dog", &widget);
///
/// assert_eq!(fragments.len(), 4);
/// assert!(matches!(fragments[0], Fragment::Blank { key: 1, label: None, .. }));
/// assert!(matches!(fragments[2], Fragment::Blank { key: 0, label: Some(0), .. }));
/// ```
pub fn rebuild(marked: &str, widget: &SelectorWidget) -> Vec<Fragment> {
    let widget_html = widget.to_html();
    let mut fragments = Vec::new();
    let mut first_blank = true;

    for segment in marker::decode(marked) {
        if let Some(key) = segment.key {
            let label = if first_blank { None } else { Some(key) };
            first_blank = false;
            fragments.push(Fragment::Blank { key, label, widget: widget_html.clone() });
        }
        if !segment.text.is_empty() {
            fragments.push(Fragment::Text { text: segment.text });
        }
    }

    fragments
}

/// Renders fragments as the inner HTML of a paragraph.
pub fn fragments_to_html(fragments: &[Fragment]) -> String {
    fragments.iter().map(Fragment::to_html).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::LookupTable;

    fn widget() -> SelectorWidget {
        let table: LookupTable = ["the", "a", "an"].into_iter().collect();
        SelectorWidget::from_table(&table)
    }

    fn text(s: &str) -> Fragment {
        Fragment::Text { text: s.to_string() }
    }

    #[test]
    fn test_plain_text_passes_through() {
        let fragments = rebuild("no blanks here", &widget());
        assert_eq!(fragments, vec![text("no blanks here")]);
    }

    #[test]
    fn test_first_blank_unlabeled_rest_labeled() {
        let widget = widget();
        let html = widget.to_html();
        let fragments = rebuild("On ##<0> hill stood ##<1> tower and ##<0> wall.", &widget);

        assert_eq!(
            fragments,
            vec![
                text("On "),
                Fragment::Blank { key: 0, label: None, widget: html.clone() },
                text(" hill stood "),
                Fragment::Blank { key: 1, label: Some(1), widget: html.clone() },
                text(" tower and "),
                Fragment::Blank { key: 0, label: Some(0), widget: html },
                text(" wall."),
            ]
        );
    }

    #[test]
    fn test_adjacent_blanks() {
        let fragments = rebuild("##<1>##<3> Katze", &widget());
        assert_eq!(fragments.len(), 3);
        assert!(matches!(fragments[0], Fragment::Blank { key: 1, label: None, .. }));
        assert!(matches!(fragments[1], Fragment::Blank { key: 3, label: Some(3), .. }));
        assert_eq!(fragments[2], text(" Katze"));
    }

    #[test]
    fn test_to_html() {
        let widget = widget();
        let html = fragments_to_html(&rebuild("##<0> a < b and ##<2>", &widget));
        let select = widget.to_html();

        assert_eq!(html, format!(r#"{} a &lt; b and <span id="2">{}</span>"#, select, select));
    }

    #[test]
    fn test_blank_count() {
        let fragments = rebuild("x ##<0> y ##<1> z ##<2>", &widget());
        assert_eq!(fragments.iter().filter(|f| f.is_blank()).count(), 3);
    }
}
