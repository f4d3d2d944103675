//! SMS character encoding.
//!
//! This module provides:
//! - Per-character classification into basic GSM-7, extended GSM-7 and non-GSM
//! - Downgrading of text to what an SMS gateway can carry
//! - Encoded unit counting and part/fragment estimation

mod gsm;
mod segments;

pub use gsm::{
    classify, is_sms_compatible, non_gsm_characters, replace_lookalikes, sms_encode, GsmClass,
};
pub use segments::{
    broadcast_fragment_count, encoded_length, sms_fragment_count, EncodedLength, PartCapacity,
    SmsEncoding, BROADCAST_MAX_CONTENT_COUNT_GSM, BROADCAST_MAX_CONTENT_COUNT_UCS2,
    SMS_CHAR_COUNT_LIMIT,
};
