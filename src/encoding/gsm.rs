//! GSM 03.38 character classification and SMS downgrading

use std::collections::HashSet;

use lazy_static::lazy_static;

/// Characters in the GSM 03.38 default alphabet (escape character excluded)
const GSM_BASIC_CHARACTERS: &str = "@£$¥èéùìòÇ\nØø\rÅåΔ_ΦΓΛΩΠΨΣΘΞÆæßÉ !\"#¤%&'()*+,-./0123456789:;<=>?¡ABCDEFGHIJKLMNOPQRSTUVWXYZÄÖÑÜ§¿abcdefghijklmnopqrstuvwxyzäöñüà";

/// Characters reached through the GSM escape table, costing two units each
const GSM_EXTENDED_CHARACTERS: &str = "^{}\\[~]|€";

/// Welsh diacritics that survive SMS downgrading even when outside GSM-7
const WELSH_DIACRITICS: &str =
    "àÀâÂäÄèÈéÉêÊëËìÌîÎïÏòÒôÔöÖùÙûÛüÜŵŴŷŶáÁíÍóÓúÚẁẀẃẂẅẄỳỲýÝÿŸ";

lazy_static! {
    static ref GSM_BASIC: HashSet<char> = GSM_BASIC_CHARACTERS.chars().collect();
    static ref GSM_EXTENDED: HashSet<char> = GSM_EXTENDED_CHARACTERS.chars().collect();
    static ref WELSH: HashSet<char> = WELSH_DIACRITICS.chars().collect();
}

/// Classification of a single character against the GSM-7 alphabet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GsmClass {
    /// In the default alphabet, one unit
    Basic,
    /// In the escape table, two units
    Extended,
    /// Outside GSM-7 entirely; forces UCS-2
    NonGsm,
}

impl GsmClass {
    /// Units this character costs in a pure GSM-7 message
    pub fn gsm_units(self) -> usize {
        match self {
            GsmClass::Basic => 1,
            GsmClass::Extended => 2,
            GsmClass::NonGsm => 1,
        }
    }
}

/// Classify one character
pub fn classify(c: char) -> GsmClass {
    if GSM_BASIC.contains(&c) {
        GsmClass::Basic
    } else if GSM_EXTENDED.contains(&c) {
        GsmClass::Extended
    } else {
        GsmClass::NonGsm
    }
}

/// Whether the character may appear in an SMS body without being replaced
pub fn is_sms_compatible(c: char) -> bool {
    classify(c) != GsmClass::NonGsm || WELSH.contains(&c)
}

/// Distinct characters outside GSM-7, in order of first appearance
pub fn non_gsm_characters(text: &str) -> Vec<char> {
    let mut seen = HashSet::new();
    text.chars()
        .filter(|c| classify(*c) == GsmClass::NonGsm)
        .filter(|c| seen.insert(*c))
        .collect()
}

/// Typographic lookalikes with a GSM-7 replacement, or `None` to drop
fn lookalike(c: char) -> Option<Option<&'static str>> {
    let replacement = match c {
        '\u{2013}' | '\u{2014}' => Some("-"),
        '\u{2026}' => Some("..."),
        '\u{2018}' | '\u{2019}' => Some("'"),
        '\u{201C}' | '\u{201D}' => Some("\""),
        '\u{00A0}' | '\t' => Some(" "),
        '\u{180E}' | '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}' => None,
        _ => return None,
    };
    Some(replacement)
}

/// Replace typographic lookalikes with their GSM-7 equivalents, leaving
/// every other character untouched
pub fn replace_lookalikes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match lookalike(c) {
            Some(Some(replacement)) => out.push_str(replacement),
            Some(None) => {}
            None => out.push(c),
        }
    }
    out
}

/// Encode text for an SMS body: lookalikes are replaced and any character
/// that cannot be sent becomes `?`
pub fn sms_encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut downgraded = 0usize;
    for c in text.chars() {
        match lookalike(c) {
            Some(Some(replacement)) => out.push_str(replacement),
            Some(None) => {}
            None if is_sms_compatible(c) => out.push(c),
            None => {
                downgraded += 1;
                out.push('?');
            }
        }
    }
    if downgraded > 0 {
        tracing::debug!(downgraded, "Replaced characters unsupported by SMS");
    }
    out
}
