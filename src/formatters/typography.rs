//! Smart quotes and dashes that leave email addresses alone

use std::ops::Range;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Wider than an email: everything between whitespace around an at sign
    static ref EMAIL_TOKEN: Regex = Regex::new(r"[^\s<>]+@[^\s<>]+").unwrap();
    static ref SPACED_HYPHEN: Regex =
        Regex::new(r"[ \t]+(?:-{1,3}|\x{2013}|\x{2014})[ \t]+").unwrap();
}

const EN_DASH_SPACED: &str = " \u{2013} ";

fn email_spans(value: &str) -> Vec<Range<usize>> {
    EMAIL_TOKEN.find_iter(value).map(|m| m.range()).collect()
}

fn opens_quote(previous: Option<char>) -> bool {
    match previous {
        None => true,
        Some(c) => {
            c.is_whitespace()
                || matches!(c, '(' | '[' | '{' | '>' | '-' | '\u{2013}' | '\u{2014}')
        }
    }
}

/// Replace straight quotes with curly ones.
///
/// Quotes inside email-address tokens are never touched. With
/// `skip_markup` set, anything between `<` and `>` is copied verbatim so
/// attribute quoting survives.
pub fn smarten_quotes(value: &str, skip_markup: bool) -> String {
    let spans = email_spans(value);
    let mut spans = spans.iter().peekable();
    let mut out = String::with_capacity(value.len() + value.len() / 8);
    let mut previous: Option<char> = None;
    let mut in_tag = false;

    for (index, c) in value.char_indices() {
        while spans.peek().is_some_and(|span| span.end <= index) {
            spans.next();
        }
        if skip_markup && c == '<' {
            in_tag = true;
        }

        let in_email = spans.peek().is_some_and(|span| span.contains(&index));
        let replacement = if in_email || in_tag {
            c
        } else {
            match c {
                '\'' if opens_quote(previous) => '\u{2018}',
                '\'' => '\u{2019}',
                '"' if opens_quote(previous) => '\u{201C}',
                '"' => '\u{201D}',
                other => other,
            }
        };

        out.push(replacement);
        if in_tag {
            if c == '>' {
                in_tag = false;
            }
        } else {
            previous = Some(c);
        }
    }

    out
}

/// Replace hyphens surrounded by spaces with a spaced en dash
pub fn replace_spaced_hyphens(value: &str) -> String {
    SPACED_HYPHEN.replace_all(value, EN_DASH_SPACED).into_owned()
}

/// Smart quotes followed by en dashes
pub fn nice_typography(value: &str, skip_markup: bool) -> String {
    replace_spaced_hyphens(&smarten_quotes(value, skip_markup))
}
