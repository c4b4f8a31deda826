//! Standalone preview page wrapper.

use maud::{DOCTYPE, Markup, PreEscaped, html};

/// Minimal styling for rendered markdown and generated reference links.
const PREVIEW_CSS: &str = "\
body { font-family: system-ui, sans-serif; max-width: 860px; margin: 2rem auto; line-height: 1.5; }\n\
a.gfm { color: #1f75cb; text-decoration: none; }\n\
a.gfm:hover { text-decoration: underline; }\n\
pre { background: #f6f8fa; padding: 1rem; overflow: auto; }\n";

/// Wraps rendered HTML in a complete preview document.
///
/// # Arguments
///
/// * `title`: Page title text (without suffix)
/// * `body`: Rendered HTML, embedded without escaping
///
/// # Returns
///
/// Complete HTML document with wrapped content
pub fn preview_page(title: &str, body: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - refmark" }
                style { (PreEscaped(PREVIEW_CSS)) }
            }
            body {
                main class="markdown-body" {
                    (PreEscaped(body))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_page_embeds_body_unescaped() {
        // Arrange
        let body = "<p>Fixes <a class=\"gfm\" href=\"/a/b/issues/1\">#1</a></p>";

        // Act
        let page = preview_page("Issue <1>", body).into_string();

        // Assert
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains(body), "Body should not be escaped: {}", page);
        assert!(
            page.contains("<title>Issue &lt;1&gt; - refmark</title>"),
            "Title should be escaped: {}",
            page
        );
    }
}
