//! Selector widgets offered at each blank.

use serde::Serialize;

use crate::lookup::LookupTable;
use crate::sampler::RemovalRecord;

/// Label of the disabled option shown before the learner picks a word.
pub const PROMPT_LABEL: &str = "Select";

/// One choice in a selector widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetOption {
    pub value: usize,
    pub label: String,
}

/// Dropdown of words offered at a blank.
///
/// Option values are lookup keys in lookup mode and removal-slot keys in
/// random mode, so the correct answer for a blank is the option whose value
/// equals the blank's marker key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectorWidget {
    pub options: Vec<WidgetOption>,
}

impl SelectorWidget {
    /// Widget listing every entry of a lookup table.
    pub fn from_table(table: &LookupTable) -> Self {
        Self {
            options: table
                .entries()
                .map(|(value, label)| WidgetOption { value, label: label.to_string() })
                .collect(),
        }
    }

    /// Widget listing the words removed from one paragraph.
    pub fn from_removals(removed: &RemovalRecord) -> Self {
        Self {
            options: removed
                .iter()
                .map(|(value, label)| WidgetOption { value: *value, label: label.clone() })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Label of the option with the given value.
    pub fn label_for(&self, value: usize) -> Option<&str> {
        self.options
            .iter()
            .find(|option| option.value == value)
            .map(|option| option.label.as_str())
    }

    /// Renders the widget as a `<select>` element.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lacuna_core::{LookupTable, SelectorWidget};
    ///
    /// let table: LookupTable = ["the", "a"].into_iter().collect();
    /// let html = SelectorWidget::from_table(&table).to_html();
    /// assert!(html.contains(r#"<option value="1">a</option>"#));
    /// ```
    pub fn to_html(&self) -> String {
        let mut html = String::from("<select>");
        html.push_str(&format!(
            r#"<option selected="selected" disabled="disabled">{}</option>"#,
            PROMPT_LABEL
        ));
        for option in &self.options {
            html.push_str(&format!(
                r#"<option value="{}">{}</option>"#,
                option.value,
                escape_html(&option.label)
            ));
        }
        html.push_str("</select>");
        html
    }
}

/// Escapes text for use in HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
