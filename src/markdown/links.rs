//! Relative link resolution for repository files.

use anyhow::{Context, Result, bail};
use std::path::{Component, Path, PathBuf};
use tracing::warn;

use crate::fragment::{Fragment, NodeExt};
use crate::reference::Project;

/// Resolves relative links in rendered markdown to repository pages.
///
/// Transforms repository internal links (./file.rs, ../docs/) into project
/// URLs for the rendered git reference (/group/project/blob/main/file.rs).
pub struct LinkResolver {
    project: Project,
    git_ref: String,
    current_path: PathBuf,
}

impl LinkResolver {
    /// Creates link resolver for a project, git reference and current file.
    ///
    /// # Arguments
    ///
    /// * `project`: Project whose repository contains the linked files
    /// * `git_ref`: Branch, tag or commit used in generated URLs
    /// * `current_path`: Path of the document being rendered; empty for
    ///   documents that do not live in the repository
    pub fn new(project: Project, git_ref: impl Into<String>, current_path: impl AsRef<Path>) -> Self {
        Self {
            project,
            git_ref: git_ref.into(),
            current_path: current_path.as_ref().to_path_buf(),
        }
    }

    /// Resolves link to a project URL.
    ///
    /// Handles different link types:
    /// - URLs with a scheme (https:, mailto:) remain unchanged
    /// - Protocol relative (//host) and site absolute (/path) links remain unchanged
    /// - Anchor links (#section) remain unchanged
    /// - Relative paths (./file.rs) resolve to /project/blob/ref/path
    /// - Parent paths (../file.rs) resolve relative to current file
    /// - Directory links (./dir/) resolve to /project/tree/ref/dir
    /// - Images resolve to /project/raw/ref/path
    ///
    /// Query strings and fragments are carried over to the resolved URL.
    ///
    /// # Arguments
    ///
    /// * `link`: Link href or image src from rendered HTML
    /// * `is_image`: Whether link is an image source
    ///
    /// # Errors
    ///
    /// Returns error if path escapes the repository root or contains invalid characters
    pub fn resolve(&self, link: &str, is_image: bool) -> Result<String> {
        if link.is_empty() || link.starts_with('#') || link.starts_with('/') || has_scheme(link) {
            return Ok(link.to_string());
        }

        let split = link.find(['?', '#']).unwrap_or(link.len());
        let (path_part, suffix) = link.split_at(split);

        let current_dir = self.current_path.parent().unwrap_or_else(|| Path::new(""));
        let normalized = normalize_path(&current_dir.join(path_part))
            .context("Failed to normalize path")?;

        let path_str = normalized.to_str().context("Path contains invalid UTF8")?;

        let kind = if is_image {
            "raw"
        } else if path_part.ends_with('/') || path_str.is_empty() {
            "tree"
        } else {
            "blob"
        };

        let mut resolved = format!("{}/{}/{}", self.project.url_path(), kind, self.git_ref);
        if !path_str.is_empty() {
            resolved.push('/');
            resolved.push_str(path_str);
        }
        resolved.push_str(suffix);

        Ok(resolved)
    }

    /// Rewrites `href` of anchors and `src` of images in `fragment`.
    ///
    /// Other attributes are never touched. Links that fail to resolve are
    /// kept as written.
    pub fn rewrite(&self, fragment: &Fragment) {
        for node in fragment.root().descendants() {
            let (attribute, is_image) = if node.is_tag("a") {
                ("href", false)
            } else if node.is_tag("img") {
                ("src", true)
            } else {
                continue;
            };

            let Some(link) = node.attribute(attribute) else {
                continue;
            };

            match self.resolve(&link, is_image) {
                Ok(resolved) if resolved != link => node.set_attribute(attribute, &resolved),
                Ok(_) => {}
                Err(e) => warn!(url = %link, "Failed to resolve relative link: {:#}", e),
            }
        }
    }
}

/// Returns whether link starts with a URI scheme (`https:`, `mailto:`).
fn has_scheme(link: &str) -> bool {
    match link.find(':') {
        Some(colon) => {
            let scheme = &link[..colon];
            !scheme.is_empty()
                && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Normalizes path by resolving .. and . components.
///
/// Security: Prevents directory traversal outside repository root.
///
/// # Errors
///
/// Returns error if path attempts to escape repository root
fn normalize_path(path: &Path) -> Result<PathBuf> {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::Normal(c) => components.push(c),
            Component::ParentDir => {
                if components.pop().is_none() {
                    bail!("Path escapes repository root: {}", path.display());
                }
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    Ok(components.iter().collect())
}
