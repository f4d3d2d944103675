//! Link detection for HTML-capable renderers.
//!
//! Recognises `scheme://host` URLs and, for SMS and broadcast previews,
//! bare domains such as `gov.uk/guidance`, wrapping each as an anchor.
//! Markup already present in the input is copied through untouched.

use lazy_static::lazy_static;
use regex::Regex;

use crate::formatters::{escape_html, unescape_html};

lazy_static! {
    static ref TAG: Regex = Regex::new(r"<[^<>]*>").unwrap();
    static ref URL: Regex = Regex::new(r"\b(?i:[a-z][a-z0-9+.\-]*)://[^\s<>\x22]+").unwrap();
    static ref URL_OR_DOMAIN: Regex = Regex::new(concat!(
        r"\b(?:(?i:[a-z][a-z0-9+.\-]*)://[^\s<>\x22]+",
        r"|(?:[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?\.)+[a-z]{2,63}(?:[/?#][^\s<>\x22]*)?)"
    ))
    .unwrap();
}

/// Entities that end a link when found inside escaped text
const TERMINATING_ENTITIES: [&str; 3] = ["&lt;", "&gt;", "&quot;"];

/// How generated anchors are decorated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStyle {
    /// Inline style for email clients
    Email,
    /// Design-system classes for in-app previews
    Preview,
}

impl LinkStyle {
    fn attributes(self) -> &'static str {
        match self {
            LinkStyle::Email => r#"style="word-wrap: break-word; color: #1D70B8;""#,
            LinkStyle::Preview => r#"class="govuk-link govuk-link--no-visited-state""#,
        }
    }
}

/// Wrap URLs in anchors. With `bare_domains`, scheme-less domains are
/// linked too and given an `http://` href.
pub fn autolink(value: &str, style: LinkStyle, bare_domains: bool) -> String {
    let pattern: &Regex = if bare_domains { &*URL_OR_DOMAIN } else { &*URL };
    let mut out = String::with_capacity(value.len());
    let mut last = 0;
    for tag in TAG.find_iter(value) {
        link_text(&value[last..tag.start()], pattern, style, &mut out);
        out.push_str(tag.as_str());
        last = tag.end();
    }
    link_text(&value[last..], pattern, style, &mut out);
    out
}

fn link_text(text: &str, pattern: &Regex, style: LinkStyle, out: &mut String) {
    let mut copied = 0;
    for found in pattern.find_iter(text) {
        let preceding = text[..found.start()].chars().next_back();
        if preceding.is_some_and(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '/' | '-' | '_'))
        {
            continue;
        }

        let link = trim_link(found.as_str());
        if link.is_empty() || (!link.contains('.') && !link.contains("://")) {
            continue;
        }

        out.push_str(&text[copied..found.start()]);
        out.push_str(&anchor(link, style));
        copied = found.start() + link.len();
    }
    out.push_str(&text[copied..]);
}

/// Cut a raw match back to the link itself, leaving closing punctuation
/// and escaped markup outside it
fn trim_link(raw: &str) -> &str {
    let mut link = raw;
    for entity in TERMINATING_ENTITIES {
        if let Some(position) = link.find(entity) {
            link = &link[..position];
        }
    }

    loop {
        let Some(last) = link.chars().next_back() else {
            return link;
        };
        let unbalanced_paren =
            last == ')' && link.matches(')').count() > link.matches('(').count();
        let punctuation = matches!(
            last,
            '.' | ',' | ';' | ':' | '!' | '?' | '\'' | '"' | '\u{2019}' | '\u{201D}' | ']'
        );
        if punctuation || unbalanced_paren {
            link = &link[..link.len() - last.len_utf8()];
        } else if link.ends_with("&amp;") {
            link = &link[..link.len() - "&amp;".len()];
        } else {
            return link;
        }
    }
}

fn anchor(link: &str, style: LinkStyle) -> String {
    let text = escape_html(&unescape_html(link));
    let href = if link.contains("://") {
        text.clone()
    } else {
        format!("http://{}", text)
    };
    format!("<a {} href=\"{}\">{}</a>", style.attributes(), href, text)
}
