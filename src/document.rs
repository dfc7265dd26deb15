//! Parsed filing document and the text windows used for scoring.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::clean::collapse_whitespace;
use crate::model::RawTable;

static TABLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("valid table selector"));

pub struct FilingDocument {
    html: Html,
    serialized: String,
}

impl FilingDocument {
    #[must_use]
    pub fn parse(raw_html: &str) -> Self {
        let html = Html::parse_document(raw_html);
        let serialized = html.html();
        Self { html, serialized }
    }

    /// Every `<table>` element in document order, nested tables included.
    #[must_use]
    pub fn tables(&self) -> Vec<RawTable> {
        self.html
            .select(&TABLE_SELECTOR)
            .enumerate()
            .map(|(index, element)| RawTable {
                index,
                html: element.html(),
                text: collect_text(element).to_lowercase(),
            })
            .collect()
    }

    /// Byte offset of the table's serialization, searched from `search_from`
    /// first and from the start of the document second.
    #[must_use]
    pub fn locate_table(&self, table: &RawTable, search_from: usize) -> Option<usize> {
        if table.html.is_empty() {
            return None;
        }

        let search_from = search_from.min(self.serialized.len());
        self.serialized
            .get(search_from..)
            .and_then(|tail| tail.find(&table.html))
            .map(|offset| search_from + offset)
            .or_else(|| self.serialized.find(&table.html))
    }

    /// Lowercased plain text of the table plus `window_chars` characters of
    /// markup on either side, re-parsed as HTML.
    #[must_use]
    pub fn context_text(&self, table: &RawTable, position: usize, window_chars: usize) -> String {
        let end = position + table.html.len();
        let (Some(before), Some(after)) = (
            self.serialized.get(..position),
            self.serialized.get(end..),
        ) else {
            return String::new();
        };

        let start = if window_chars == 0 {
            position
        } else {
            before
                .char_indices()
                .rev()
                .nth(window_chars - 1)
                .map_or(0, |(index, _)| index)
        };
        let stop = after
            .char_indices()
            .nth(window_chars)
            .map_or(self.serialized.len(), |(index, _)| end + index);

        let fragment = Html::parse_fragment(&self.serialized[start..stop]);
        collect_text(fragment.root_element()).to_lowercase()
    }
}

/// Elements whose boundaries separate words. Inline markup such as `<span>`
/// or `<b>` does not.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "caption", "dd", "div", "dl", "dt",
    "figcaption", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li",
    "main", "nav", "ol", "p", "pre", "section", "table", "tbody", "td", "tfoot", "th", "thead",
    "tr", "ul",
];

fn push_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child) = ElementRef::wrap(child) {
            let block = BLOCK_ELEMENTS.contains(&child.value().name());
            if block {
                out.push(' ');
            }
            push_text(child, out);
            if block {
                out.push(' ');
            }
        }
    }
}

/// Element text with inline runs concatenated, a space at every block or
/// cell boundary, and whitespace collapsed.
#[must_use]
pub fn collect_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    push_text(element, &mut out);
    collapse_whitespace(&out)
}
