//! Block-level element classification.

use std::collections::HashSet;

/// Tags rendered as block boxes by default.
///
/// Covers the HTML flow-content elements that start a new line when
/// displayed, plus table and list structure elements.
const DEFAULT_BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "caption",
    "dd",
    "details",
    "dialog",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hgroup",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "summary",
    "table",
    "tbody",
    "td",
    "tfoot",
    "th",
    "thead",
    "tr",
    "ul",
];

/// Lookup table deciding which tags are block elements.
///
/// The truncator signals block boundaries with an ellipsis, so the table
/// controls where excerpts stop. Tag names are compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockTable {
    tags: HashSet<String>,
}

impl BlockTable {
    /// Creates table from explicit tag list.
    ///
    /// # Arguments
    ///
    /// * `tags`: Tag names treated as block elements
    pub fn with_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tags: tags
                .into_iter()
                .map(|tag| tag.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Returns whether `tag` is classified as a block element.
    pub fn is_block(&self, tag: &str) -> bool {
        self.tags.contains(&tag.to_ascii_lowercase())
    }

    /// Marks additional tag as block element.
    pub fn insert(&mut self, tag: &str) {
        self.tags.insert(tag.to_ascii_lowercase());
    }

    /// Removes tag from block classification.
    pub fn remove(&mut self, tag: &str) {
        self.tags.remove(&tag.to_ascii_lowercase());
    }
}

impl Default for BlockTable {
    fn default() -> Self {
        Self::with_tags(DEFAULT_BLOCK_TAGS)
    }
}
