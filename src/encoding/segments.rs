//! Encoded length and transport part counting

use serde::Serialize;

use super::gsm::{classify, GsmClass};

/// Longest SMS body (prefix excluded) accepted before a message is too long
pub const SMS_CHAR_COUNT_LIMIT: usize = 918;

/// Broadcast capacity when every character is in GSM-7
pub const BROADCAST_MAX_CONTENT_COUNT_GSM: usize = 1_395;

/// Broadcast capacity once any character forces UCS-2
pub const BROADCAST_MAX_CONTENT_COUNT_UCS2: usize = 615;

/// Transport encoding chosen for a whole message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsEncoding {
    Gsm7,
    Ucs2,
}

/// Unit capacity of a single part and of each part of a concatenated message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartCapacity {
    pub single: usize,
    pub concatenated: usize,
}

impl SmsEncoding {
    /// SMS part capacities for this encoding
    pub fn sms_capacity(self) -> PartCapacity {
        match self {
            SmsEncoding::Gsm7 => PartCapacity {
                single: 160,
                concatenated: 153,
            },
            SmsEncoding::Ucs2 => PartCapacity {
                single: 70,
                concatenated: 67,
            },
        }
    }

    /// Maximum units a broadcast may carry in this encoding
    pub fn broadcast_capacity(self) -> usize {
        match self {
            SmsEncoding::Gsm7 => BROADCAST_MAX_CONTENT_COUNT_GSM,
            SmsEncoding::Ucs2 => BROADCAST_MAX_CONTENT_COUNT_UCS2,
        }
    }
}

/// Result of measuring a message against the GSM-7 alphabet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedLength {
    /// Characters in the message
    pub characters: usize,
    /// Units on the wire: extended characters count twice in GSM-7 and
    /// every character counts once in UCS-2
    pub units: usize,
    pub encoding: SmsEncoding,
}

/// Measure text in a single pass
pub fn encoded_length(text: &str) -> EncodedLength {
    let mut characters = 0;
    let mut gsm_units = 0;
    let mut unicode = false;

    for c in text.chars() {
        let class = classify(c);
        characters += 1;
        gsm_units += class.gsm_units();
        if class == GsmClass::NonGsm {
            unicode = true;
        }
    }

    if unicode {
        EncodedLength {
            characters,
            units: characters,
            encoding: SmsEncoding::Ucs2,
        }
    } else {
        EncodedLength {
            characters,
            units: gsm_units,
            encoding: SmsEncoding::Gsm7,
        }
    }
}

/// Number of SMS parts needed to carry `units` in the given encoding
pub fn sms_fragment_count(units: usize, encoding: SmsEncoding) -> usize {
    let capacity = encoding.sms_capacity();
    if units <= capacity.single {
        1
    } else {
        units.div_ceil(capacity.concatenated)
    }
}

/// Number of whole broadcast capacities needed to carry `units`
pub fn broadcast_fragment_count(units: usize, encoding: SmsEncoding) -> usize {
    units.div_ceil(encoding.broadcast_capacity()).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_length_gsm() {
        let length = encoded_length("Hello [world]");
        assert_eq!(length.characters, 13);
        assert_eq!(length.units, 15);
        assert_eq!(length.encoding, SmsEncoding::Gsm7);
    }

    #[test]
    fn test_encoded_length_ucs2_counts_every_character_once() {
        let length = encoded_length("[Ŵ]");
        assert_eq!(length.characters, 3);
        assert_eq!(length.units, 3);
        assert_eq!(length.encoding, SmsEncoding::Ucs2);
    }

    #[test]
    fn test_sms_fragment_boundaries_gsm() {
        assert_eq!(sms_fragment_count(0, SmsEncoding::Gsm7), 1);
        assert_eq!(sms_fragment_count(160, SmsEncoding::Gsm7), 1);
        assert_eq!(sms_fragment_count(161, SmsEncoding::Gsm7), 2);
        assert_eq!(sms_fragment_count(306, SmsEncoding::Gsm7), 2);
        assert_eq!(sms_fragment_count(307, SmsEncoding::Gsm7), 3);
        assert_eq!(sms_fragment_count(918, SmsEncoding::Gsm7), 6);
        assert_eq!(sms_fragment_count(919, SmsEncoding::Gsm7), 7);
    }

    #[test]
    fn test_sms_fragment_boundaries_ucs2() {
        assert_eq!(sms_fragment_count(70, SmsEncoding::Ucs2), 1);
        assert_eq!(sms_fragment_count(71, SmsEncoding::Ucs2), 2);
        assert_eq!(sms_fragment_count(134, SmsEncoding::Ucs2), 2);
        assert_eq!(sms_fragment_count(135, SmsEncoding::Ucs2), 3);
    }

    #[test]
    fn test_broadcast_fragments() {
        assert_eq!(broadcast_fragment_count(0, SmsEncoding::Gsm7), 1);
        assert_eq!(broadcast_fragment_count(1_395, SmsEncoding::Gsm7), 1);
        assert_eq!(broadcast_fragment_count(1_396, SmsEncoding::Gsm7), 2);
        assert_eq!(broadcast_fragment_count(615, SmsEncoding::Ucs2), 1);
        assert_eq!(broadcast_fragment_count(616, SmsEncoding::Ucs2), 2);
    }
}
