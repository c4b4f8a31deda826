//! Wrapping rendered one-line HTML in a link.
//!
//! Rendered titles often contain generated reference links (`#123`). Putting
//! the whole title inside another `<a>` would nest anchors, which HTML does
//! not allow, so the target link is distributed over the top-level text
//! instead and generated references keep their own targets.

use anyhow::{Context, Result};
use maud::{Markup, PreEscaped};
use tracing::{debug, trace};

use crate::fragment::{FragmentParser, Html5Parser, NodeExt, NodeRef, element};

/// Class marking anchors produced by reference expansion.
pub const GENERATED_REFERENCE_CLASS: &str = "gfm";

/// Display options applied to inserted links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkOptions {
    /// Class added to inserted links and to generated reference links.
    pub css_class: Option<String>,
    /// Additional attributes for inserted links (title, data-*, ...).
    pub attributes: Vec<(String, String)>,
}

impl LinkOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.css_class = Some(class.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Builds anchor to `url` wrapping `text` with these options.
    ///
    /// Extra attributes never replace the target: an `href` among them is
    /// skipped.
    fn anchor(&self, url: &str, text: &str) -> NodeRef {
        let anchor = element("a", [("href", url.to_string())]);

        if let Some(class) = &self.css_class {
            anchor.add_class(class);
        }
        for (name, value) in &self.attributes {
            let name = name.to_ascii_lowercase();
            if name == "href" {
                debug!(value = %value, "ignoring href in extra link attributes");
                continue;
            }
            anchor.set_attribute(&name, value);
        }

        anchor.append(NodeRef::new_text(text));
        anchor
    }
}

/// Wraps rendered single-line HTML in a link to `url`.
///
/// Uses the default HTML5 parser. See [`link_wrap_with`].
///
/// # Errors
///
/// Returns error if the parser fails to produce a fragment tree
pub fn link_wrap(rendered_body: &str, url: &str, options: &LinkOptions) -> Result<Markup> {
    link_wrap_with(&Html5Parser::new(), rendered_body, url, options)
}

/// Wraps rendered single-line HTML in a link to `url` using `parser`.
///
/// - A body that is a single anchor is replaced by an anchor to `url`
///   wrapping the original anchor's text
/// - Otherwise every top-level text node becomes an anchor to `url`, and
///   existing anchors and other elements are kept untouched
///
/// When `options.css_class` is set, anchors marked with
/// [`GENERATED_REFERENCE_CLASS`] gain that class as well.
///
/// # Arguments
///
/// * `parser`: Fragment parser
/// * `rendered_body`: HTML rendered from one line of markdown
/// * `url`: Link target for the body
/// * `options`: Attributes applied to inserted links
///
/// # Returns
///
/// Pre-escaped markup safe to embed directly
///
/// # Errors
///
/// Returns error if the parser fails to produce a fragment tree
pub fn link_wrap_with<P>(
    parser: &P,
    rendered_body: &str,
    url: &str,
    options: &LinkOptions,
) -> Result<Markup>
where
    P: FragmentParser + ?Sized,
{
    if rendered_body.trim().is_empty() {
        return Ok(PreEscaped(String::new()));
    }

    let fragment = parser
        .parse(rendered_body)
        .context("Failed to parse rendered body for link wrapping")?;

    let top_level: Vec<NodeRef> = fragment.children().collect();

    match top_level.as_slice() {
        [only] if only.is_tag("a") => {
            trace!(url, "replacing single anchor body");
            only.insert_after(options.anchor(url, &only.text_contents()));
            only.detach();
        }
        nodes => {
            for node in nodes {
                let Some(text) = node.as_text() else {
                    continue;
                };
                let text = text.borrow().clone();
                node.insert_after(options.anchor(url, &text));
                node.detach();
            }
        }
    }

    if let Some(class) = &options.css_class {
        fragment
            .root()
            .descendants()
            .filter(|node| node.is_tag("a") && node.has_class(GENERATED_REFERENCE_CLASS))
            .for_each(|anchor| anchor.add_class(class));
    }

    Ok(PreEscaped(fragment.to_html()?))
}
