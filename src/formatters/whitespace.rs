//! Whitespace and newline normalisation

/// Characters with no safe rendering; removed without leaving a gap
fn is_unsupported(c: char) -> bool {
    matches!(
        c,
        '\u{2028}'
            | '\u{2029}'
            | '\u{180E}'
            | '\u{200B}'
            | '\u{200C}'
            | '\u{200D}'
            | '\u{2060}'
            | '\u{FEFF}'
    ) || (c.is_control() && !c.is_whitespace())
}

/// Convert `\r\n` and lone `\r` to `\n`
pub fn normalise_newlines(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(c);
        }
    }
    out
}

/// Remove line/paragraph separators, zero-width characters and control
/// characters other than whitespace
pub fn strip_unsupported_characters(value: &str) -> String {
    value.chars().filter(|c| !is_unsupported(*c)).collect()
}

/// Collapse every run of whitespace, newlines included, to a single space
/// and trim the ends
pub fn normalise_whitespace(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut pending_space = false;
    for c in value.chars() {
        if is_unsupported(c) {
            continue;
        }
        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(c);
    }
    out
}

/// Normalise a multi-line body.
///
/// Newline variants become `\n`, unsupported characters are dropped, each
/// line is trimmed with inner whitespace runs collapsed to one space, runs
/// of blank lines collapse to a single blank line and the result is
/// trimmed.
pub fn normalise_lines(value: &str) -> String {
    let value = strip_unsupported_characters(&normalise_newlines(value));
    let mut out = String::with_capacity(value.len());
    let mut newlines = 0usize;
    let mut pending_space = false;

    for c in value.chars() {
        if c == '\n' {
            if !out.is_empty() {
                newlines += 1;
            }
            pending_space = false;
            continue;
        }
        if c.is_whitespace() {
            pending_space = newlines == 0 && !out.is_empty();
            continue;
        }

        if newlines > 0 {
            out.push_str(if newlines == 1 { "\n" } else { "\n\n" });
        } else if pending_space {
            out.push(' ');
        }
        newlines = 0;
        pending_space = false;
        out.push(c);
    }

    out
}
