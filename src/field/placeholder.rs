//! `((name))` and `((name??text))` placeholders, and the scanner that
//! finds them.
//!
//! Conditional text may itself contain placeholders, so matching is done
//! by counting balanced `((` / `))` pairs rather than with a pattern.

const OPEN: &str = "((";
const CLOSE: &str = "))";
const CONDITIONAL_SEPARATOR: &str = "??";

/// Placeholder parsed from the text between `((` and `))`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'a> {
    body: &'a str,
}

impl<'a> Placeholder<'a> {
    pub fn new(body: &'a str) -> Self {
        Self { body }
    }

    /// Name used to look up personalisation
    pub fn name(&self) -> &'a str {
        match self.body.split_once(CONDITIONAL_SEPARATOR) {
            Some((name, _)) => name.trim(),
            None => self.body.trim(),
        }
    }

    pub fn is_conditional(&self) -> bool {
        self.body.contains(CONDITIONAL_SEPARATOR)
    }

    /// Text shown when the condition holds, possibly with its own placeholders
    pub fn conditional_text(&self) -> Option<&'a str> {
        self.body
            .split_once(CONDITIONAL_SEPARATOR)
            .map(|(_, text)| text)
    }
}

/// Piece of a field: literal text or a placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Placeholder(Placeholder<'a>),
}

/// Split `content` into literal text and top-level placeholders
pub fn segments(content: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut literal_start = 0;
    let mut cursor = 0;

    while let Some(offset) = content[cursor..].find(OPEN) {
        let start = cursor + offset;
        match placeholder_end(content, start) {
            Some(end) => {
                if literal_start < start {
                    out.push(Segment::Text(&content[literal_start..start]));
                }
                out.push(Segment::Placeholder(Placeholder::new(
                    &content[start + OPEN.len()..end],
                )));
                cursor = end + CLOSE.len();
                literal_start = cursor;
            }
            // `(((name)))` keeps its outer bracket as text
            None => cursor = start + 1,
        }
    }

    if literal_start < content.len() {
        out.push(Segment::Text(&content[literal_start..]));
    }
    out
}

/// Byte index of the `))` closing the placeholder opened at `start`.
///
/// Bodies may nest balanced placeholders after the `??` separator; a lone
/// bracket or an empty body means no placeholder starts here.
fn placeholder_end(content: &str, start: usize) -> Option<usize> {
    let bytes = content.as_bytes();
    let body_start = start + OPEN.len();
    let mut depth = 0usize;
    let mut i = body_start;

    while i < bytes.len() {
        let rest = &bytes[i..];
        if rest.starts_with(OPEN.as_bytes()) {
            depth += 1;
            i += OPEN.len();
        } else if rest.starts_with(CLOSE.as_bytes()) {
            if depth == 0 {
                return is_valid_body(&content[body_start..i]).then_some(i);
            }
            depth -= 1;
            i += CLOSE.len();
        } else if bytes[i] == b'(' || bytes[i] == b')' {
            return None;
        } else {
            i += 1;
        }
    }
    None
}

fn is_valid_body(body: &str) -> bool {
    if body.is_empty() {
        return false;
    }
    let name = body
        .split_once(CONDITIONAL_SEPARATOR)
        .map_or(body, |(name, _)| name);
    !name.contains(['(', ')'])
}
