//! Text helpers shared by the view helpers.

use regex::Regex;
use std::sync::LazyLock;

/// Character or named entity reference at the start of a string.
static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^&(?:[A-Za-z][A-Za-z0-9]*|#[0-9]+|#[xX][0-9A-Fa-f]+);")
        .expect("entity pattern is valid")
});

/// Escapes HTML special characters without double-escaping entities.
///
/// Text that was already escaped (`&lt;`, `&#39;`, `&amp;`) keeps its
/// entity references; bare ampersands and markup characters are escaped.
///
/// # Arguments
///
/// * `text`: Text that may contain entity references
///
/// # Returns
///
/// HTML safe string
pub fn escape_once(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for (index, c) in text.char_indices() {
        match c {
            '&' if ENTITY.is_match(&text[index..]) => escaped.push('&'),
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }

    escaped
}

/// Returns whether text is empty or whitespace only.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
