//! Integration tests for rendering, excerpts and link wrapping.

mod common;

use anyhow::Result;
use pretty_assertions::assert_eq;
use refmark::fragment::{FragmentParser, Html5Parser};
use refmark::{
    Issue, LinkOptions, Note, Pipeline, Project, RenderContext, cross_reference, link_wrap,
    truncate_visible,
};

/// Tests blank markdown renders to nothing.
#[test]
fn test_markdown_blank_text() -> Result<()> {
    // Arrange
    let helper = common::helper();

    // Act
    let html = helper.markdown("", &common::project_context())?;
    let whitespace = helper.markdown(" \n\t", &common::project_context())?;

    // Assert
    assert_eq!(html, "");
    assert_eq!(whitespace, "");
    Ok(())
}

/// Tests references expand while code spans stay literal.
#[test]
fn test_markdown_expands_references_outside_code() -> Result<()> {
    // Arrange
    let helper = common::helper();

    // Act
    let html = helper.markdown("`#1` and #2", &common::project_context())?;

    // Assert
    assert!(html.contains("<code>#1</code>"), "{}", html);
    assert!(
        html.contains("<a href=\"/group/project/issues/2\""),
        "{}",
        html
    );
    assert_eq!(html.matches("<a ").count(), 1, "{}", html);
    Ok(())
}

/// Tests references stay plain text without a project.
#[test]
fn test_markdown_without_project_keeps_references() -> Result<()> {
    // Arrange
    let helper = common::helper();

    // Act
    let html = helper.markdown("Fixes #2", &RenderContext::new())?;

    // Assert
    assert_eq!(html, "<p>Fixes #2</p>\n");
    Ok(())
}

/// Tests excerpt stops at the first paragraph boundary.
#[test]
fn test_first_line_stops_at_paragraph() -> Result<()> {
    // Arrange
    let helper = common::helper();

    // Act
    let html = helper.first_line_in_markdown(
        "Fix the build\n\nMore details here",
        None,
        &RenderContext::new(),
    )?;

    // Assert
    assert_eq!(html, "<p>Fix the build...</p>");
    Ok(())
}

/// Tests excerpt of a single paragraph has no ellipsis.
#[test]
fn test_first_line_single_paragraph_unchanged() -> Result<()> {
    // Arrange
    let helper = common::helper();

    // Act
    let html = helper.first_line_in_markdown("Just one line", Some(100), &RenderContext::new())?;

    // Assert
    assert_eq!(html, "<p>Just one line</p>");
    Ok(())
}

/// Tests excerpt of a list keeps only the first item.
#[test]
fn test_first_line_of_list() -> Result<()> {
    // Arrange
    let helper = common::helper();

    // Act
    let html = helper.first_line_in_markdown("- one\n- two\n", None, &RenderContext::new())?;

    // Assert
    assert_eq!(html, "<ul>\n<li>one...</li></ul>");
    Ok(())
}

/// Tests excerpt budget counts reference text but not its markup.
#[test]
fn test_first_line_budget_spans_reference_link() -> Result<()> {
    // Arrange
    let helper = common::helper();

    // Act
    let html = helper.first_line_in_markdown(
        "Fixes #12 in the parser",
        Some(9),
        &common::project_context(),
    )?;

    // Assert
    assert!(
        html.starts_with("<p>Fixes <a href=\"/group/project/issues/12\""),
        "{}",
        html
    );
    assert!(html.ends_with(">#12</a>...</p>"), "{}", html);
    Ok(())
}

/// Tests excerpt of blank markdown is empty.
#[test]
fn test_first_line_blank() -> Result<()> {
    // Arrange
    let helper = common::helper();

    // Act
    let html = helper.first_line_in_markdown("   ", Some(10), &RenderContext::new())?;

    // Assert
    assert_eq!(html, "");
    Ok(())
}

/// Tests title text is linked around a generated reference.
#[test]
fn test_link_to_gfm_distributes_link_around_reference() -> Result<()> {
    // Arrange
    let helper = common::helper();
    let options = LinkOptions::new().with_class("title");

    // Act
    let markup = helper.link_to_gfm(
        "Fix #1 crash",
        "/group/project/issues/2",
        &options,
        &common::project_context(),
    )?;

    // Assert
    assert_eq!(
        markup.into_string(),
        "<a href=\"/group/project/issues/2\" class=\"title\">Fix </a>\
         <a href=\"/group/project/issues/1\" data-reference-type=\"issue\" \
         data-project=\"group/project\" class=\"gfm gfm-issue title\">#1</a>\
         <a href=\"/group/project/issues/2\" class=\"title\"> crash</a>"
    );
    Ok(())
}

/// Tests a body that is only a reference becomes a single target link.
#[test]
fn test_link_to_gfm_single_reference() -> Result<()> {
    // Arrange
    let helper = common::helper();

    // Act
    let markup = helper.link_to_gfm(
        "#1",
        "/group/project/merge_requests/9",
        &LinkOptions::new(),
        &common::project_context(),
    )?;

    // Assert
    assert_eq!(
        markup.into_string(),
        "<a href=\"/group/project/merge_requests/9\">#1</a>"
    );
    Ok(())
}

/// Tests markup in titles is escaped, never rendered.
#[test]
fn test_link_to_gfm_escapes_markup() -> Result<()> {
    // Arrange
    let helper = common::helper();

    // Act
    let markup = helper.link_to_gfm(
        "Use <script> tags",
        "/x",
        &LinkOptions::new(),
        &RenderContext::new(),
    )?;

    // Assert
    assert_eq!(
        markup.into_string(),
        "<a href=\"/x\">Use &lt;script&gt; tags</a>"
    );
    Ok(())
}

/// Tests the context pipeline is ignored in favour of single line rendering.
#[test]
fn test_link_to_gfm_forces_single_line() -> Result<()> {
    // Arrange
    let helper = common::helper();
    let context = common::project_context().with_pipeline(Pipeline::Full);

    // Act
    let markup = helper.link_to_gfm("Plain title", "/x", &LinkOptions::new(), &context)?;

    // Assert
    assert_eq!(markup.into_string(), "<a href=\"/x\">Plain title</a>");
    Ok(())
}

/// Tests truncation leaves short fragments untouched.
#[test]
fn test_truncate_noop_within_budget() -> Result<()> {
    // Arrange
    let html = "Some <em>inline</em> <a href=\"/a\">text</a>";

    // Act
    let result = truncate_visible(html, 1_000)?;

    // Assert
    assert_eq!(result, html);
    Ok(())
}

/// Tests zero budget output parses back to an ellipsis-only fragment.
#[test]
fn test_truncate_zero_budget_is_valid_html() -> Result<()> {
    // Arrange
    let html = "<p>Hello <strong>world</strong></p><ul><li>a</li></ul>";

    // Act
    let result = truncate_visible(html, 0)?;
    let reparsed = Html5Parser::new().parse(&result)?;

    // Assert
    assert_eq!(reparsed.to_html()?, result, "Output should be well formed");
    assert_eq!(reparsed.text_content(), "...");
    Ok(())
}

/// Tests truncation is independent across threads.
#[test]
fn test_truncate_concurrent_calls() -> Result<()> {
    // Arrange
    let inputs: Vec<String> = (0..8)
        .map(|i| format!("<p>item {} with a long tail</p>", i))
        .collect();

    // Act
    let results: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| scope.spawn(move || truncate_visible(input, 6)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("Thread should not panic"))
            .collect::<Result<Vec<_>>>()
    })?;

    // Assert
    for (i, result) in results.iter().enumerate() {
        assert_eq!(result, &format!("<p>item {}...</p>", i));
    }
    Ok(())
}

/// Tests link wrapping on its own output does not nest anchors.
#[test]
fn test_link_wrap_idempotent() -> Result<()> {
    // Arrange
    let options = LinkOptions::new().with_class("bold");
    let first = link_wrap("<a href=\"/issues/1\" class=\"gfm\">#1</a>", "/other", &options)?;

    // Act
    let second = link_wrap(&first.0, "/other", &options)?;

    // Assert
    assert_eq!(second.0, first.0);
    assert_eq!(second.0.matches("<a ").count(), 1);
    Ok(())
}

/// Tests cross-project references through the public API.
#[test]
fn test_cross_reference() {
    // Arrange
    let project = Project::new("gitlab-org", "gitlab");

    // Act
    let issue = cross_reference(&project, &Issue { iid: 123 });
    let note = cross_reference(
        &project,
        &Note {
            id: 1,
            body: "text".to_string(),
        },
    );

    // Assert
    assert_eq!(issue, "gitlab-org/gitlab#123");
    assert_eq!(note, "");
}
