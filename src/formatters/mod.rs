//! Content normalisation applied before rendering and before counting.
//!
//! This module provides:
//! - Newline, whitespace and blank-line normalisation
//! - Removal of characters with no safe rendering
//! - Smart quotes and en dashes that never alter email addresses
//! - Small HTML helpers shared by the HTML-capable renderers

mod html;
mod typography;
mod whitespace;

pub use html::{escape_html, nl2br, strip_html, unescape_html};
pub use typography::{nice_typography, replace_spaced_hyphens, smarten_quotes};
pub use whitespace::{
    normalise_lines, normalise_newlines, normalise_whitespace, strip_unsupported_characters,
};

/// Prepend `"{prefix}: "` when a prefix is present
pub fn add_prefix(body: &str, prefix: Option<&str>) -> String {
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{}: {}", prefix, body),
        _ => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_prefix() {
        assert_eq!(add_prefix("Hello", Some("GDS")), "GDS: Hello");
        assert_eq!(add_prefix("Hello", None), "Hello");
        assert_eq!(add_prefix("Hello", Some("")), "Hello");
    }
}
