//! Issue and merge request reference expansion.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::fragment::{Fragment, NodeExt, NodeRef, element};
use crate::link_wrap::GENERATED_REFERENCE_CLASS;
use crate::reference::Project;

/// `#123`, `!45`, optionally prefixed by `namespace/project`.
static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<project>[A-Za-z0-9_.\-]+(?:/[A-Za-z0-9_.\-]+)+)?(?P<kind>[#!])(?P<iid>[0-9]+)\b")
        .expect("reference pattern is valid")
});

/// Elements whose text is never scanned for references.
const IGNORED_PARENTS: &[&str] = &["a", "code", "pre", "kbd", "style", "script"];

/// Kind of referenced entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReferenceKind {
    Issue,
    MergeRequest,
}

impl ReferenceKind {
    fn from_sigil(sigil: &str) -> Option<Self> {
        match sigil {
            "#" => Some(Self::Issue),
            "!" => Some(Self::MergeRequest),
            _ => None,
        }
    }

    fn type_name(self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::MergeRequest => "merge_request",
        }
    }

    fn route(self) -> &'static str {
        match self {
            Self::Issue => "issues",
            Self::MergeRequest => "merge_requests",
        }
    }
}

/// Expands reference tokens in text into generated reference links.
///
/// Local references (`#12`) resolve against the context project, qualified
/// references (`group/other#12`) against the named project. Text inside
/// links and code is left alone. Generated anchors carry the
/// [`GENERATED_REFERENCE_CLASS`] marker class.
pub struct ReferenceFilter<'a> {
    project: &'a Project,
}

impl<'a> ReferenceFilter<'a> {
    pub fn new(project: &'a Project) -> Self {
        Self { project }
    }

    /// Expands references in every eligible text node of `fragment`.
    pub fn apply(&self, fragment: &Fragment) {
        self.expand(fragment.root());
    }

    fn expand(&self, parent: &NodeRef) {
        let mut next = parent.first_child();

        while let Some(node) = next {
            next = node.next_sibling();

            if let Some(text) = node.as_text() {
                let text = text.borrow().clone();
                self.split_text(&node, &text);
            } else if node.as_element().is_some()
                && !IGNORED_PARENTS.iter().any(|tag| node.is_tag(tag))
            {
                self.expand(&node);
            }
        }
    }

    /// Replaces `node` with text and anchors when `text` holds references.
    fn split_text(&self, node: &NodeRef, text: &str) {
        let mut last = 0;

        for captures in REFERENCE.captures_iter(text) {
            let Some(whole) = captures.get(0) else {
                continue;
            };

            // Tokens glued to a preceding word (`abc#1`) are not references.
            let glued = text[..whole.start()]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphanumeric() || c == '_');
            if glued {
                continue;
            }

            let Some(anchor) = self.reference_link(&captures) else {
                continue;
            };

            if whole.start() > last {
                node.insert_before(NodeRef::new_text(&text[last..whole.start()]));
            }
            node.insert_before(anchor);
            last = whole.end();
        }

        if last == 0 {
            return;
        }
        if last < text.len() {
            node.insert_before(NodeRef::new_text(&text[last..]));
        }
        node.detach();
    }

    fn reference_link(&self, captures: &Captures<'_>) -> Option<NodeRef> {
        let kind = ReferenceKind::from_sigil(captures.name("kind")?.as_str())?;
        let iid: u64 = captures.name("iid")?.as_str().parse().ok()?;

        let project = match captures.name("project") {
            Some(name) => Project::parse(name.as_str())?,
            None => self.project.clone(),
        };

        let href = format!("{}/{}/{}", project.url_path(), kind.route(), iid);
        let class = format!(
            "{} {}-{}",
            GENERATED_REFERENCE_CLASS,
            GENERATED_REFERENCE_CLASS,
            kind.type_name()
        );

        let anchor = element(
            "a",
            [
                ("href", href),
                ("data-reference-type", kind.type_name().to_string()),
                ("data-project", project.full_path()),
                ("class", class),
            ],
        );
        anchor.append(NodeRef::new_text(&captures[0]));
        Some(anchor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::{FragmentParser, Html5Parser};
    use pretty_assertions::assert_eq;

    fn expand(html: &str) -> String {
        let project = Project::new("group", "project");
        let fragment = Html5Parser::new().parse(html).expect("Should parse");
        ReferenceFilter::new(&project).apply(&fragment);
        fragment.to_html().expect("Should serialize")
    }

    #[test]
    fn test_expands_local_issue_reference() {
        // Arrange & Act
        let html = expand("<p>Fixes #12.</p>");

        // Assert
        assert_eq!(
            html,
            "<p>Fixes <a href=\"/group/project/issues/12\" data-reference-type=\"issue\" \
             data-project=\"group/project\" class=\"gfm gfm-issue\">#12</a>.</p>"
        );
    }

    #[test]
    fn test_expands_merge_request_reference() {
        // Arrange & Act
        let html = expand("See !45");

        // Assert
        assert!(
            html.contains("<a href=\"/group/project/merge_requests/45\""),
            "{}",
            html
        );
        assert!(html.contains("class=\"gfm gfm-merge_request\">!45</a>"), "{}", html);
    }

    #[test]
    fn test_expands_cross_project_reference() {
        // Arrange & Act
        let html = expand("Blocked by other/repo#7");

        // Assert
        assert!(
            html.contains("href=\"/other/repo/issues/7\""),
            "{}",
            html
        );
        assert!(html.contains(">other/repo#7</a>"), "{}", html);
    }

    #[test]
    fn test_skips_links_and_code() {
        // Arrange
        let input = "<a href=\"/x\">#1</a> <code>#2</code><pre>#3</pre>";

        // Act
        let html = expand(input);

        // Assert
        assert_eq!(html, input);
    }

    #[test]
    fn test_skips_tokens_glued_to_words() {
        // Arrange & Act
        let html = expand("color#123 and C#1");

        // Assert
        assert_eq!(html, "color#123 and C#1");
    }

    #[test]
    fn test_multiple_references_in_one_text_node() {
        // Arrange & Act
        let html = expand("#1, #2");

        // Assert
        assert_eq!(html.matches("class=\"gfm gfm-issue\"").count(), 2);
        assert!(html.contains("</a>, <a"), "{}", html);
    }

    #[test]
    fn test_escaped_text_survives_expansion() {
        // Arrange & Act
        let html = expand("a &lt; b #1");

        // Assert
        assert!(html.starts_with("a &lt; b <a "), "{}", html);
    }
}
