//! Markdown rendering with GitHub Flavored Markdown support.
//!
//! This module provides the renderer boundary used by the view helpers:
//! comrak rendering with GFM extensions and syntax highlighting, followed by
//! post-processing filters that rewrite repository relative links and
//! expand issue and merge request references into generated links.

mod links;
mod pipeline;
mod references;
mod renderer;

pub use links::LinkResolver;
pub use pipeline::MarkdownPipeline;
pub use references::ReferenceFilter;
pub use renderer::MarkdownRenderer;
