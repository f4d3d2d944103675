//! HTML escaping helpers

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAG: Regex = Regex::new(r"<[^<>]*>").unwrap();
}

/// Entity-encode `&`, `<` and `>`
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Drop anything that looks like a tag, then escape what remains
pub fn strip_html(value: &str) -> String {
    escape_html(&TAG.replace_all(value, ""))
}

/// Reverse of [`escape_html`]
pub fn unescape_html(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Turn each newline into a `<br>`
pub fn nl2br(value: &str) -> String {
    value.replace('\n', "<br>")
}
