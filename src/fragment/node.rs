//! Parsed fragments and element helpers over the kuchiki DOM.

use anyhow::{Context, Result};
use kuchiki::iter::Siblings;
use kuchiki::{Attribute, ExpandedName, NodeRef};
use markup5ever::{LocalName, Namespace, QualName};
use std::sync::Arc;

use super::BlockTable;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Qualified name of an HTML element.
pub(crate) fn html_name(tag: &str) -> QualName {
    QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(tag))
}

/// Creates a detached HTML element with attributes in the given order.
///
/// # Arguments
///
/// * `tag`: Element name
/// * `attributes`: Name and value pairs in the null namespace
pub fn element<'a, I>(tag: &str, attributes: I) -> NodeRef
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    NodeRef::new_element(
        html_name(tag),
        attributes.into_iter().map(|(name, value)| {
            (
                ExpandedName::new("", name),
                Attribute {
                    prefix: None,
                    value,
                },
            )
        }),
    )
}

/// Element queries and edits on DOM nodes.
///
/// Every method is a no-op (or returns the empty answer) on nodes that are
/// not elements.
pub trait NodeExt {
    /// Local name of the element.
    fn tag(&self) -> Option<&str>;

    /// Whether the node is an element named `tag` (ASCII case-insensitive).
    fn is_tag(&self, tag: &str) -> bool {
        self.tag().is_some_and(|name| name.eq_ignore_ascii_case(tag))
    }

    /// Value of attribute `name` in the null namespace.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Sets attribute `name`, keeping its position when it already exists.
    fn set_attribute(&self, name: &str, value: &str);

    /// Whether the `class` attribute contains `class` as a token.
    fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Adds whitespace separated class tokens, skipping ones already present.
    fn add_class(&self, classes: &str);
}

impl NodeExt for NodeRef {
    fn tag(&self) -> Option<&str> {
        self.as_element().map(|element| &*element.name.local)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        let element = self.as_element()?;
        let attributes = element.attributes.borrow();
        attributes.get(name).map(str::to_string)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        if let Some(element) = self.as_element() {
            element
                .attributes
                .borrow_mut()
                .insert(name, value.to_string());
        }
    }

    fn add_class(&self, classes: &str) {
        let Some(element) = self.as_element() else {
            return;
        };
        let mut attributes = element.attributes.borrow_mut();

        let mut current: Vec<String> = attributes
            .get("class")
            .map(|existing| existing.split_whitespace().map(String::from).collect())
            .unwrap_or_default();

        for class in classes.split_whitespace() {
            if !current.iter().any(|c| c == class) {
                current.push(class.to_string());
            }
        }

        if !current.is_empty() {
            attributes.insert("class", current.join(" "));
        }
    }
}

/// Parsed HTML fragment.
///
/// The fragment's nodes are the children of a synthetic root element. Edits
/// go straight to the DOM through kuchiki's `NodeRef` API, and
/// [`Fragment::to_html`] writes the root's children with html5ever's
/// serializer.
#[derive(Clone)]
pub struct Fragment {
    root: NodeRef,
    blocks: Arc<BlockTable>,
}

impl Fragment {
    /// Wraps the root element of a fragment parse.
    pub fn new(root: NodeRef, blocks: Arc<BlockTable>) -> Self {
        Self { root, blocks }
    }

    /// Synthetic parent of the top-level nodes.
    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    /// Top-level nodes in document order.
    pub fn children(&self) -> Siblings {
        self.root.children()
    }

    /// Whether `node` is an element classified as a block by the parser.
    pub fn is_block(&self, node: &NodeRef) -> bool {
        node.tag().is_some_and(|tag| self.blocks.is_block(tag))
    }

    /// Concatenated text of every text node in document order.
    pub fn text_content(&self) -> String {
        self.root.text_contents()
    }

    /// Serializes the top-level nodes to HTML.
    ///
    /// # Errors
    ///
    /// Returns error if the serializer fails to write a node
    pub fn to_html(&self) -> Result<String> {
        let mut html = Vec::new();

        for child in self.root.children() {
            child
                .serialize(&mut html)
                .context("Failed to serialize HTML fragment")?;
        }

        String::from_utf8(html).context("Serialized HTML is not valid UTF8")
    }
}
