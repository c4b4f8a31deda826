//! Visible-length truncation of rendered HTML.
//!
//! Cuts an HTML fragment down to a budget of visible characters (text that
//! renders on screen, excluding markup) while keeping the output well formed.
//! Truncation also stops at the first line break inside a text node and at
//! the end of the first block element that is followed by more content, so
//! an excerpt never runs across visually separate blocks.

use anyhow::{Context, Result};
use tracing::trace;

use crate::fragment::{Fragment, FragmentParser, Html5Parser, NodeRef};

/// Marker appended where content was cut.
pub const ELLIPSIS: &str = "...";

/// Truncates HTML to `max_chars` visible characters.
///
/// Uses the default HTML5 parser and block table. See
/// [`truncate_visible_with`] for the traversal rules.
///
/// # Arguments
///
/// * `html`: Rendered HTML fragment
/// * `max_chars`: Visible character budget
///
/// # Returns
///
/// Serialized HTML of the truncated fragment
///
/// # Errors
///
/// Returns error if the parser fails to produce a fragment tree
pub fn truncate_visible(html: &str, max_chars: usize) -> Result<String> {
    truncate_visible_with(&Html5Parser::new(), html, max_chars)
}

/// Truncates HTML to `max_chars` visible characters using `parser`.
///
/// Walks the fragment depth-first in document order:
/// - Whitespace-only text collapses when rendered and neither counts toward
///   the budget nor gets cut
/// - Text spanning several lines keeps its first line plus [`ELLIPSIS`]
/// - Text longer than the remaining budget keeps exactly the remaining
///   characters plus [`ELLIPSIS`]
/// - A block element followed by a sibling with visible content gets an
///   [`ELLIPSIS`] appended as its last child
/// - Every node after the truncation point is removed
///
/// # Errors
///
/// Returns error if the parser fails to produce a fragment tree
pub fn truncate_visible_with<P>(parser: &P, html: &str, max_chars: usize) -> Result<String>
where
    P: FragmentParser + ?Sized,
{
    let fragment = parser
        .parse(html)
        .context("Failed to parse HTML for truncation")?;

    let mut cursor = Cursor::new(&fragment, max_chars);
    cursor.truncate_children(fragment.root());

    trace!(
        max_chars,
        visible = cursor.visible_length,
        truncated = cursor.truncated,
        "truncated html fragment"
    );

    fragment.to_html()
}

/// Per-call truncation state.
struct Cursor<'a> {
    fragment: &'a Fragment,
    max_chars: usize,
    visible_length: usize,
    truncated: bool,
}

impl<'a> Cursor<'a> {
    fn new(fragment: &'a Fragment, max_chars: usize) -> Self {
        Self {
            fragment,
            max_chars,
            visible_length: 0,
            truncated: false,
        }
    }

    fn remaining(&self) -> usize {
        self.max_chars.saturating_sub(self.visible_length)
    }

    fn truncate_children(&mut self, parent: &NodeRef) {
        let mut next = parent.first_child();

        while let Some(node) = next {
            next = node.next_sibling();

            if self.truncated {
                node.detach();
                continue;
            }

            if let Some(text) = node.as_text() {
                self.truncate_text(&mut text.borrow_mut());
            } else if node.as_element().is_some() {
                self.truncate_children(&node);

                if !self.truncated
                    && self.fragment.is_block(&node)
                    && node.following_siblings().any(|sibling| is_visible(&sibling))
                {
                    node.append(NodeRef::new_text(ELLIPSIS));
                    self.truncated = true;
                }
            }
        }
    }

    fn truncate_text(&mut self, text: &mut String) {
        if text.trim().is_empty() {
            return;
        }

        let remaining = self.remaining();

        if text.trim().lines().count() > 1 {
            let first_line = text
                .lines()
                .find(|line| !line.trim().is_empty())
                .unwrap_or_default();
            let kept: String = first_line.chars().take(remaining).collect();

            self.visible_length += kept.chars().count();
            *text = kept + ELLIPSIS;
            self.truncated = true;
            return;
        }

        let length = text.chars().count();
        if length > remaining {
            let kept: String = text.chars().take(remaining).collect();

            self.visible_length += remaining;
            *text = kept + ELLIPSIS;
            self.truncated = true;
            return;
        }

        self.visible_length += length;
    }
}

/// Whether a node is an element or renders non-whitespace text.
fn is_visible(node: &NodeRef) -> bool {
    match node.as_text() {
        Some(text) => !text.borrow().trim().is_empty(),
        None => node.as_element().is_some(),
    }
}
