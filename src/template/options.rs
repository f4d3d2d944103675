//! Per-render options

use serde::{Deserialize, Serialize};

/// Rendering options, all independently settable.
///
/// Fields that do not apply to a variant are ignored by it: SMS variants
/// read the prefix and sender fields, email variants the branding and
/// sender-address fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderOptions {
    /// Service name prepended to SMS bodies
    pub prefix: Option<String>,
    pub show_prefix: bool,

    /// Display name shown in SMS previews
    pub sender: Option<String>,
    pub show_sender: bool,

    /// Show a `To:` line built from the recipient placeholder in previews
    pub show_recipient: bool,

    /// Omit placeholders that have no value instead of highlighting them
    pub redact_missing_personalisation: bool,

    /// Replace characters an SMS gateway cannot carry with `?`
    pub downgrade_non_sms_characters: bool,

    /// Wrap HTML email in a full document rather than a body fragment
    pub complete_html: bool,

    pub govuk_banner: bool,
    pub brand_banner: bool,
    pub brand_logo: Option<String>,
    pub brand_text: Option<String>,
    pub brand_colour: Option<String>,
    pub brand_name: Option<String>,

    pub from_name: Option<String>,
    pub from_address: Option<String>,
    pub reply_to: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            prefix: None,
            show_prefix: true,
            sender: None,
            show_sender: false,
            show_recipient: false,
            redact_missing_personalisation: false,
            downgrade_non_sms_characters: true,
            complete_html: true,
            govuk_banner: true,
            brand_banner: false,
            brand_logo: None,
            brand_text: None,
            brand_colour: None,
            brand_name: None,
            from_name: None,
            from_address: None,
            reply_to: None,
        }
    }
}

impl RenderOptions {
    /// Prefix to render, if any
    pub fn visible_prefix(&self) -> Option<&str> {
        if self.show_prefix {
            self.prefix.as_deref().filter(|prefix| !prefix.is_empty())
        } else {
            None
        }
    }

    /// Sender to render, if any
    pub fn visible_sender(&self) -> Option<&str> {
        if self.show_sender {
            self.sender.as_deref().filter(|sender| !sender.is_empty())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let options = RenderOptions::default();
        assert!(options.show_prefix);
        assert!(options.downgrade_non_sms_characters);
        assert!(options.complete_html);
        assert!(!options.redact_missing_personalisation);
    }

    #[test]
    fn test_visible_prefix_respects_flag() {
        let mut options = RenderOptions {
            prefix: Some("GDS".to_string()),
            ..RenderOptions::default()
        };
        assert_eq!(options.visible_prefix(), Some("GDS"));
        options.show_prefix = false;
        assert_eq!(options.visible_prefix(), None);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options: RenderOptions =
            serde_json::from_value(json!({"sender": "GOVUK", "show_sender": true})).unwrap();
        assert_eq!(options.visible_sender(), Some("GOVUK"));
        assert!(options.downgrade_non_sms_characters);
    }
}
