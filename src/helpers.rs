//! View helpers combining rendering with HTML post-processing.
//!
//! These are the entry points used when displaying user content: full
//! documents, one-line excerpts of documents, and titles that link to the
//! entity they describe.

use anyhow::{Context, Result};
use maud::{Markup, PreEscaped};
use tracing::debug;

use crate::context::{Pipeline, RenderContext};
use crate::fragment::Html5Parser;
use crate::link_wrap::{LinkOptions, link_wrap_with};
use crate::markdown::MarkdownPipeline;
use crate::truncate::truncate_visible_with;
use crate::util::{escape_once, is_blank};

/// Markdown view helpers over an injected renderer.
pub struct MarkdownHelper<R> {
    renderer: R,
    parser: Html5Parser,
}

impl<R: MarkdownPipeline> MarkdownHelper<R> {
    /// Creates helper with the default fragment parser.
    pub fn new(renderer: R) -> Self {
        Self::with_parser(renderer, Html5Parser::new())
    }

    /// Creates helper using `parser` for truncation and link wrapping.
    pub fn with_parser(renderer: R, parser: Html5Parser) -> Self {
        Self { renderer, parser }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Renders markdown for display.
    ///
    /// # Arguments
    ///
    /// * `text`: Markdown source
    /// * `context`: Display context (project, pipeline, location)
    ///
    /// # Returns
    ///
    /// Rendered and post-processed HTML, or empty string for blank text
    ///
    /// # Errors
    ///
    /// Returns error if rendering or post-processing fails
    pub fn markdown(&self, text: &str, context: &RenderContext) -> Result<String> {
        if is_blank(text) {
            return Ok(String::new());
        }

        let html = self
            .renderer
            .render(text, context)
            .context("Failed to render markdown")?;

        self.renderer
            .post_process(&html, context)
            .context("Failed to post-process rendered markdown")
    }

    /// Renders markdown and keeps only its first line.
    ///
    /// The rendered HTML is cut at the first line break, the first block
    /// boundary, or after `max_chars` visible characters, whichever comes
    /// first.
    ///
    /// # Arguments
    ///
    /// * `text`: Markdown source
    /// * `max_chars`: Visible character budget; unlimited when `None`
    /// * `context`: Display context
    ///
    /// # Errors
    ///
    /// Returns error if rendering or truncation fails
    pub fn first_line_in_markdown(
        &self,
        text: &str,
        max_chars: Option<usize>,
        context: &RenderContext,
    ) -> Result<String> {
        let html = self.markdown(text, context)?;
        let html = html.trim();

        if html.is_empty() {
            return Ok(String::new());
        }

        let max_chars = max_chars.unwrap_or_else(|| html.chars().count());
        truncate_visible_with(&self.parser, html, max_chars)
    }

    /// Renders one line of markdown as a link to `url`.
    ///
    /// The body is escaped before rendering so user text never becomes
    /// markup, except for bodies that already are an `<img>` tag, which are
    /// trusted pre-rendered markup and skip rendering. Generated reference
    /// links inside the body keep their own targets.
    ///
    /// # Arguments
    ///
    /// * `body`: One line of markdown, e.g. an issue title
    /// * `url`: Link target for the body
    /// * `options`: Attributes for inserted links
    /// * `context`: Display context; the pipeline is forced to single line
    ///
    /// # Errors
    ///
    /// Returns error if rendering or link wrapping fails
    pub fn link_to_gfm(
        &self,
        body: &str,
        url: &str,
        options: &LinkOptions,
        context: &RenderContext,
    ) -> Result<Markup> {
        if is_blank(body) {
            return Ok(PreEscaped(String::new()));
        }

        let context = context.clone().with_pipeline(Pipeline::SingleLine);

        let rendered = if body.starts_with("<img") {
            debug!("passing pre-rendered image body through");
            body.to_string()
        } else {
            self.renderer
                .render(&escape_once(body), &context)
                .context("Failed to render link body")?
        };

        let processed = self
            .renderer
            .post_process(&rendered, &context)
            .context("Failed to post-process link body")?;

        link_wrap_with(&self.parser, &processed, url, options)
    }
}
