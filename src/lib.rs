//! Markdown display helpers for project-hosted content.
//!
//! Renders GitHub Flavored Markdown with issue and merge request reference
//! links, cuts rendered HTML down to one-line excerpts without breaking the
//! markup, and turns rendered titles into links without nesting anchors.

mod config;
mod context;
pub mod fragment;
mod helpers;
mod link_wrap;
mod markdown;
mod page;
mod reference;
mod truncate;
mod util;

pub use config::{Command, Config};
pub use context::{Pipeline, RenderContext};
pub use helpers::MarkdownHelper;
pub use link_wrap::{GENERATED_REFERENCE_CLASS, LinkOptions, link_wrap, link_wrap_with};
pub use markdown::{LinkResolver, MarkdownPipeline, MarkdownRenderer, ReferenceFilter};
pub use page::preview_page;
pub use reference::{
    Entity, Issue, MergeRequest, Note, Project, Referenceable, cross_reference,
};
pub use truncate::{ELLIPSIS, truncate_visible, truncate_visible_with};
pub use util::escape_once;
