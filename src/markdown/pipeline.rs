//! Renderer boundary.

use anyhow::Result;

use crate::context::RenderContext;

/// Converts markdown text to HTML for a given display context.
///
/// Rendering and post-processing are separate steps so cached renders can be
/// post-processed per request. Both steps must produce HTML that the
/// fragment parser accepts; malformed output is repaired, not rejected.
pub trait MarkdownPipeline {
    /// Renders markdown `text` to HTML.
    ///
    /// # Errors
    ///
    /// Returns error if rendering fails
    fn render(&self, text: &str, context: &RenderContext) -> Result<String>;

    /// Applies context dependent filters to rendered HTML.
    ///
    /// # Errors
    ///
    /// Returns error if a filter fails
    fn post_process(&self, html: &str, context: &RenderContext) -> Result<String>;
}
