//! Markdown rendering with GitHub Flavored Markdown support.

use anyhow::{Context, Result};
use comrak::Options;
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use tracing::debug;

use super::{LinkResolver, MarkdownPipeline, ReferenceFilter};
use crate::context::{Pipeline, RenderContext};
use crate::fragment::{FragmentParser, Html5Parser, NodeExt, NodeRef};

/// Renders markdown to HTML with GitHub Flavored Markdown extensions.
///
/// Provides GFM extensions including tables, strikethrough, autolinks,
/// task lists and footnotes. Uses syntect for code block syntax
/// highlighting when a language is specified. Post-processing resolves
/// repository relative links and expands issue and merge request references
/// for the project in the render context.
pub struct MarkdownRenderer<'a> {
    options: Options<'a>,
    syntax_set: SyntaxSet,
    parser: Html5Parser,
}

impl<'a> MarkdownRenderer<'a> {
    /// Creates renderer with GitHub Flavored Markdown options.
    ///
    /// Configures all GFM extensions and security settings:
    /// - Tables, strikethrough, autolinks, task lists, footnotes
    /// - Smart punctuation for quotes and dashes
    /// - Raw HTML is escaped rather than passed through
    /// - Syntax highlighting with syntect using CSS classes
    pub fn new() -> Self {
        let mut options = Options::default();

        // Extension options (GFM features)
        options.extension.strikethrough = true;
        options.extension.table = true;
        options.extension.autolink = true;
        options.extension.tasklist = true;
        options.extension.footnotes = true;

        options.parse.smart = true;

        // User content: raw HTML is escaped, never passed through
        options.render.unsafe_ = false;
        options.render.escape = true;

        Self {
            options,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            parser: Html5Parser::new(),
        }
    }

    /// Creates renderer that passes raw HTML through unescaped.
    ///
    /// Only for trusted content such as repository documentation.
    pub fn trusted() -> Self {
        let mut renderer = Self::new();
        renderer.options.render.unsafe_ = true;
        renderer.options.render.escape = false;
        renderer
    }

    /// Renders single line markdown to inline HTML.
    ///
    /// Comrak wraps inline content in a paragraph; a lone wrapper is removed
    /// so the result can be embedded in titles and links.
    fn render_single_line(&self, content: &str) -> String {
        let html = comrak::markdown_to_html(content, &self.options);
        let trimmed = html.trim();

        match trimmed
            .strip_prefix("<p>")
            .and_then(|inner| inner.strip_suffix("</p>"))
        {
            Some(inner) if !inner.contains("<p>") => inner.to_string(),
            _ => trimmed.to_string(),
        }
    }

    /// Highlights fenced code blocks in rendered HTML.
    ///
    /// Comrak marks fenced blocks as `<pre><code class="language-X">`. The
    /// text of each block goes through syntect and the resulting `hljs-`
    /// spans replace the block's children. Blocks in languages without a
    /// syntax definition stay as rendered.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or highlighting fails
    fn highlight(&self, html: String) -> Result<String> {
        if !html.contains("class=\"language-") {
            return Ok(html);
        }

        let fragment = self
            .parser
            .parse(&html)
            .context("Failed to parse rendered markdown for highlighting")?;

        let blocks: Vec<NodeRef> = fragment
            .root()
            .descendants()
            .filter(|node| node.is_tag("code") && node.parent().is_some_and(|pre| pre.is_tag("pre")))
            .collect();

        for code in blocks {
            let Some(language) = code.attribute("class").and_then(|classes| {
                classes
                    .split_whitespace()
                    .find_map(|class| class.strip_prefix("language-"))
                    .map(str::to_string)
            }) else {
                continue;
            };

            let Some(spans) = self.highlight_code(&code.text_contents(), &language)? else {
                continue;
            };
            let highlighted = self
                .parser
                .parse(&spans)
                .with_context(|| format!("Failed to parse highlighted {} code", language))?;

            for child in code.children().collect::<Vec<_>>() {
                child.detach();
            }
            for child in highlighted.children().collect::<Vec<_>>() {
                code.append(child);
            }
        }

        fragment.to_html()
    }

    /// Highlights code with syntect using `hljs-` prefixed CSS classes.
    ///
    /// # Returns
    ///
    /// Highlighted HTML, or `None` when no syntax matches `language`
    ///
    /// # Errors
    ///
    /// Returns error if syntax highlighting fails
    fn highlight_code(&self, code: &str, language: &str) -> Result<Option<String>> {
        let Some(syntax) = self.syntax_set.find_syntax_by_token(language) else {
            debug!(language, "no syntax definition, keeping plain code");
            return Ok(None);
        };

        let mut generator = ClassedHTMLGenerator::new_with_class_style(
            syntax,
            &self.syntax_set,
            ClassStyle::SpacedPrefixed { prefix: "hljs-" },
        );

        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .with_context(|| format!("Failed to highlight {} code", language))?;
        }

        Ok(Some(generator.finalize()))
    }
}

impl<'a> MarkdownPipeline for MarkdownRenderer<'a> {
    fn render(&self, text: &str, context: &RenderContext) -> Result<String> {
        match context.pipeline {
            Pipeline::SingleLine => Ok(self.render_single_line(text)),
            Pipeline::Full => {
                let html = comrak::markdown_to_html(text, &self.options);
                self.highlight(html)
            }
        }
    }

    fn post_process(&self, html: &str, context: &RenderContext) -> Result<String> {
        let Some(project) = &context.project else {
            return Ok(html.to_string());
        };

        let fragment = self
            .parser
            .parse(html)
            .context("Failed to parse rendered markdown for post-processing")?;

        if let Some(git_ref) = &context.git_ref {
            LinkResolver::new(
                project.clone(),
                git_ref.as_str(),
                context.requested_path.as_deref().unwrap_or(""),
            )
            .rewrite(&fragment);
        }
        ReferenceFilter::new(project).apply(&fragment);

        fragment.to_html()
    }
}

impl<'a> Default for MarkdownRenderer<'a> {
    fn default() -> Self {
        Self::new()
    }
}
