//! HTML5 fragment parsing.

use anyhow::{Context, Result};
use kuchiki::traits::TendrilSink;
use std::sync::Arc;
use tracing::trace;

use super::node::html_name;
use super::{BlockTable, Fragment};

/// Parses HTML strings into fragment trees.
///
/// Implementations must repair malformed markup instead of failing; an error
/// is reserved for parser failures that leave no usable tree.
pub trait FragmentParser {
    /// Parses `html` as a body-context fragment.
    ///
    /// # Errors
    ///
    /// Returns error if the parser produces no tree for the input.
    fn parse(&self, html: &str) -> Result<Fragment>;
}

/// Fragment parser backed by html5ever (via kuchiki).
///
/// Tree construction follows the HTML5 fragment parsing algorithm with a
/// `<body>` context element, so unclosed tags, stray end tags and misnested
/// inline elements are repaired exactly as a browser would repair them.
#[derive(Debug, Clone, Default)]
pub struct Html5Parser {
    blocks: Arc<BlockTable>,
}

impl Html5Parser {
    /// Creates parser with the default block table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates parser classifying block elements with `blocks`.
    pub fn with_blocks(blocks: BlockTable) -> Self {
        Self {
            blocks: Arc::new(blocks),
        }
    }
}

impl FragmentParser for Html5Parser {
    fn parse(&self, html: &str) -> Result<Fragment> {
        let document = kuchiki::parse_fragment(html_name("body"), Vec::new()).one(html);

        // Fragment parsing places the nodes under a synthetic <html> element.
        let root = document
            .children()
            .find(|node| node.as_element().is_some())
            .with_context(|| format!("HTML parser produced no fragment root for input: {html:?}"))?;

        trace!(bytes = html.len(), "parsed html fragment");

        Ok(Fragment::new(root, Arc::clone(&self.blocks)))
    }
}
