//! SMS message, preview and body-preview templates

use std::fmt;

use super::options::RenderOptions;
use super::personalisation::Personalisation;
use super::traits::{Capabilities, SmsSizable, Template, TemplateBase};
use super::types::{TemplateResult, TemplateSpec, TemplateType};
use crate::encoding::{
    encoded_length, replace_lookalikes, sms_encode, sms_fragment_count, EncodedLength,
    SmsEncoding, SMS_CHAR_COUNT_LIMIT,
};
use crate::field::{Field, HtmlMode, PlaceholderStyle};
use crate::formatters::{add_prefix, escape_html, nl2br, normalise_lines, normalise_whitespace};
use crate::links::{autolink, LinkStyle};

/// Personalised text used for sizing.
///
/// Placeholders without a value are left out of `body` and each counted
/// as one character in `unresolved`, whatever the length of its name, so
/// `((a)) ((b))` with no values counts 2.
#[derive(Debug, Clone)]
pub(super) struct Measured {
    pub body: String,
    pub unresolved: usize,
}

impl Measured {
    pub fn of(base: &TemplateBase) -> Self {
        let field = Field::new(&base.spec.content, &base.values)
            .html(HtmlMode::Passthrough)
            .markdown_lists(true)
            .redact_missing(base.options.redact_missing_personalisation);
        Self {
            body: replace_lookalikes(&normalise_lines(&field.clone().redact_missing(true).render())),
            unresolved: field.unresolved_count(),
        }
    }

    pub fn with_prefix(self, prefix: Option<&str>) -> Self {
        Self {
            body: add_prefix(&self.body, prefix),
            unresolved: self.unresolved,
        }
    }

    pub fn characters(&self) -> usize {
        self.body.chars().count() + self.unresolved
    }

    pub fn encoded(&self) -> EncodedLength {
        let mut length = encoded_length(&self.body);
        length.characters += self.unresolved;
        length.units += self.unresolved;
        length
    }
}

/// Personalised plain-text body shared by SMS and broadcast messages
pub(super) fn plain_body(base: &TemplateBase) -> String {
    let field = Field::new(&base.spec.content, &base.values)
        .html(HtmlMode::Passthrough)
        .style(PlaceholderStyle::Plain)
        .markdown_lists(true)
        .redact_missing(base.options.redact_missing_personalisation);
    normalise_lines(&field.render())
}

/// Escaped, linked body shared by SMS and broadcast previews
pub(super) fn preview_body(base: &TemplateBase, prefix: Option<&str>) -> String {
    let field = Field::new(&base.spec.content, &base.values)
        .html(HtmlMode::Escape)
        .markdown_lists(true)
        .redact_missing(base.options.redact_missing_personalisation);
    let prefix = prefix.map(escape_html);
    let body = add_prefix(&normalise_lines(&field.render()), prefix.as_deref());
    let body = downgrade(base, body);
    autolink(&nl2br(&body), LinkStyle::Preview, true)
}

pub(super) fn downgrade(base: &TemplateBase, body: String) -> String {
    if base.options.downgrade_non_sms_characters {
        sms_encode(&body)
    } else {
        body
    }
}

fn check_sms(
    variant: &'static str,
    spec: TemplateSpec,
    options: RenderOptions,
) -> TemplateResult<TemplateBase> {
    TemplateBase::new(variant, TemplateType::Sms, spec, options)
}

fn sms_content_count(base: &TemplateBase) -> usize {
    Measured::of(base)
        .with_prefix(base.options.visible_prefix())
        .characters()
}

fn sms_content_count_without_prefix(base: &TemplateBase) -> usize {
    Measured::of(base).characters()
}

fn sms_encoded(base: &TemplateBase) -> EncodedLength {
    Measured::of(base)
        .with_prefix(base.options.visible_prefix())
        .encoded()
}

/// Implements the SMS sizing queries for a variant wrapping a `base` field
macro_rules! sms_sizing {
    ($variant:ty) => {
        impl $variant {
            /// Characters in the personalised body, prefix excluded
            pub fn content_count_without_prefix(&self) -> usize {
                sms_content_count_without_prefix(&self.base)
            }
        }

        impl SmsSizable for $variant {
            fn encoding(&self) -> SmsEncoding {
                sms_encoded(&self.base).encoding
            }

            fn encoded_content_count(&self) -> usize {
                sms_encoded(&self.base).units
            }

            fn fragment_count(&self) -> usize {
                let length = sms_encoded(&self.base);
                sms_fragment_count(length.units, length.encoding)
            }
        }
    };
}

/// The text an SMS gateway sends
#[derive(Debug, Clone, PartialEq)]
pub struct SmsMessageTemplate {
    base: TemplateBase,
}

impl SmsMessageTemplate {
    pub const NAME: &'static str = "SMSMessageTemplate";

    pub fn new(spec: TemplateSpec, options: RenderOptions) -> TemplateResult<Self> {
        Ok(Self {
            base: check_sms(Self::NAME, spec, options)?,
        })
    }

    pub fn with_values(mut self, values: Personalisation) -> Self {
        self.base.values = values;
        self
    }
}

impl fmt::Display for SmsMessageTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = add_prefix(&plain_body(&self.base), self.base.options.visible_prefix());
        f.write_str(&downgrade(&self.base, body))
    }
}

impl Template for SmsMessageTemplate {
    fn variant_name(&self) -> &'static str {
        Self::NAME
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            has_subject: false,
            is_sms_like: true,
            is_preview: false,
        }
    }

    fn base(&self) -> &TemplateBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut TemplateBase {
        &mut self.base
    }

    fn content_count(&self) -> usize {
        sms_content_count(&self.base)
    }

    fn is_message_empty(&self) -> bool {
        self.content_count_without_prefix() == 0
    }

    fn is_message_too_long(&self) -> bool {
        self.content_count_without_prefix() > SMS_CHAR_COUNT_LIMIT
    }
}

sms_sizing!(SmsMessageTemplate);

/// In-app preview of an SMS inside a phone-style wrapper
#[derive(Debug, Clone, PartialEq)]
pub struct SmsPreviewTemplate {
    base: TemplateBase,
}

impl SmsPreviewTemplate {
    pub const NAME: &'static str = "SMSPreviewTemplate";

    pub fn new(spec: TemplateSpec, options: RenderOptions) -> TemplateResult<Self> {
        Ok(Self {
            base: check_sms(Self::NAME, spec, options)?,
        })
    }

    pub fn with_values(mut self, values: Personalisation) -> Self {
        self.base.values = values;
        self
    }

    fn recipient(&self) -> String {
        Field::new("((phone number))", &self.base.values)
            .style(PlaceholderStyle::NoBrackets)
            .render()
    }
}

impl fmt::Display for SmsPreviewTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.base.options.show_recipient {
            writeln!(
                f,
                "<p class=\"sms-message-recipient\">To: {}</p>",
                self.recipient()
            )?;
        }
        f.write_str("<div class=\"sms-message-wrapper\">")?;
        if let Some(sender) = self.base.options.visible_sender() {
            write!(
                f,
                "<span class=\"sms-message-sender\">From: {}</span>",
                escape_html(sender)
            )?;
        }
        f.write_str(&preview_body(&self.base, self.base.options.visible_prefix()))?;
        f.write_str("</div>")
    }
}

impl Template for SmsPreviewTemplate {
    fn variant_name(&self) -> &'static str {
        Self::NAME
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            has_subject: false,
            is_sms_like: true,
            is_preview: true,
        }
    }

    fn base(&self) -> &TemplateBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut TemplateBase {
        &mut self.base
    }

    fn content_count(&self) -> usize {
        sms_content_count(&self.base)
    }

    fn is_message_empty(&self) -> bool {
        self.content_count_without_prefix() == 0
    }

    fn is_message_too_long(&self) -> bool {
        self.content_count_without_prefix() > SMS_CHAR_COUNT_LIMIT
    }
}

sms_sizing!(SmsPreviewTemplate);

/// Single-line escaped body, used in lists of messages
#[derive(Debug, Clone, PartialEq)]
pub struct SmsBodyPreviewTemplate {
    base: TemplateBase,
}

impl SmsBodyPreviewTemplate {
    pub const NAME: &'static str = "SMSBodyPreviewTemplate";

    pub fn new(spec: TemplateSpec, options: RenderOptions) -> TemplateResult<Self> {
        Ok(Self {
            base: check_sms(Self::NAME, spec, options)?,
        })
    }

    pub fn with_values(mut self, values: Personalisation) -> Self {
        self.base.values = values;
        self
    }
}

impl fmt::Display for SmsBodyPreviewTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = Field::new(&self.base.spec.content, &self.base.values)
            .html(HtmlMode::Escape)
            .redact_missing(true);
        let body = downgrade(&self.base, field.render());
        f.write_str(&normalise_whitespace(&body))
    }
}

impl Template for SmsBodyPreviewTemplate {
    fn variant_name(&self) -> &'static str {
        Self::NAME
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            has_subject: false,
            is_sms_like: true,
            is_preview: true,
        }
    }

    fn base(&self) -> &TemplateBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut TemplateBase {
        &mut self.base
    }

    fn content_count(&self) -> usize {
        sms_content_count(&self.base)
    }

    fn is_message_empty(&self) -> bool {
        self.content_count_without_prefix() == 0
    }

    fn is_message_too_long(&self) -> bool {
        self.content_count_without_prefix() > SMS_CHAR_COUNT_LIMIT
    }
}

sms_sizing!(SmsBodyPreviewTemplate);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateError;

    fn sms(content: &str) -> SmsMessageTemplate {
        SmsMessageTemplate::new(TemplateSpec::sms(content), RenderOptions::default()).unwrap()
    }

    #[test]
    fn test_rejects_other_template_types() {
        let result = SmsMessageTemplate::new(
            TemplateSpec::email("subject", "content"),
            RenderOptions::default(),
        );
        assert_eq!(
            result.unwrap_err().to_string(),
            "Cannot initialise SMSMessageTemplate with email template_type"
        );
        assert!(matches!(
            SmsPreviewTemplate::new(TemplateSpec::broadcast("x"), RenderOptions::default()),
            Err(TemplateError::InvalidTemplateType { .. })
        ));
    }

    #[test]
    fn test_content_count_examples() {
        let cases: Vec<(&str, Personalisation, usize)> = vec![
            ("深", Personalisation::new(), 1),
            ("Ŵ", Personalisation::new(), 1),
            ("'First line.\n", Personalisation::new(), 12),
            ("\t\n\r", Personalisation::new(), 0),
            ("Just content", Personalisation::new(), 12),
            ("  ", Personalisation::new(), 0),
            (
                "((placeholder))  ",
                Personalisation::new().with("placeholder", "  "),
                0,
            ),
            (
                "Content with ((placeholder))",
                Personalisation::new().with("placeholder", "something extra here"),
                33,
            ),
        ];
        for (content, values, expected) in cases {
            let template = sms(content).with_values(values);
            assert_eq!(template.content_count(), expected, "content: {:?}", content);
        }
    }

    #[test]
    fn test_content_count_before_and_after_values() {
        let mut template = sms("Content with ((placeholder))");
        assert_eq!(template.content_count(), 13);
        template.set_values(Personalisation::new().with("placeholder", ""));
        assert_eq!(template.content_count(), 12);
    }

    #[test]
    fn test_prefix_counted_but_not_limited() {
        let options = RenderOptions {
            prefix: Some("GDS".to_string()),
            ..RenderOptions::default()
        };
        let template =
            SmsMessageTemplate::new(TemplateSpec::sms("Just content"), options).unwrap();
        assert_eq!(template.to_string(), "GDS: Just content");
        assert_eq!(template.content_count(), 17);
        assert_eq!(template.content_count_without_prefix(), 12);
    }

    #[test]
    fn test_message_too_long_ignores_prefix() {
        let options = RenderOptions {
            prefix: Some("A long service name".to_string()),
            ..RenderOptions::default()
        };
        let at_limit =
            SmsMessageTemplate::new(TemplateSpec::sms("a".repeat(918)), options.clone()).unwrap();
        assert!(!at_limit.is_message_too_long());
        let over = SmsMessageTemplate::new(TemplateSpec::sms("a".repeat(919)), options).unwrap();
        assert!(over.is_message_too_long());
    }

    #[test]
    fn test_render_downgrades_non_sms_characters() {
        assert_eq!(sms("Hello 深 Ŵ \u{2019}").to_string(), "Hello ? Ŵ '");

        let options = RenderOptions {
            downgrade_non_sms_characters: false,
            ..RenderOptions::default()
        };
        let template = SmsMessageTemplate::new(TemplateSpec::sms("Hello 深"), options).unwrap();
        assert_eq!(template.to_string(), "Hello 深");
    }

    #[test]
    fn test_render_missing_placeholder_plain() {
        assert_eq!(sms("Hi ((name))").to_string(), "Hi ((name))");
    }

    #[test]
    fn test_fragment_count_gsm_and_unicode() {
        assert_eq!(sms(&"a".repeat(160)).fragment_count(), 1);
        assert_eq!(sms(&"a".repeat(161)).fragment_count(), 2);
        assert_eq!(sms(&"[".repeat(80)).fragment_count(), 1);
        assert_eq!(sms(&"[".repeat(81)).fragment_count(), 2);
        assert_eq!(sms(&"ŵ".repeat(70)).fragment_count(), 1);
        assert_eq!(sms(&"ŵ".repeat(71)).fragment_count(), 2);
        assert_eq!(sms(&format!("{}ŵ", "à".repeat(80))).fragment_count(), 2);
    }

    #[test]
    fn test_fragment_count_counts_non_gsm_before_downgrade() {
        let template = sms(&"深".repeat(70));
        assert_eq!(template.encoding(), SmsEncoding::Ucs2);
        assert_eq!(template.fragment_count(), 1);
        assert_eq!(sms(&"深".repeat(71)).fragment_count(), 2);
    }

    #[test]
    fn test_is_message_empty() {
        assert!(sms("  \n ").is_message_empty());
        let template = sms("((name))").with_values(Personalisation::new().with("name", " "));
        assert!(template.is_message_empty());
        assert!(!sms("((name))").is_message_empty());
        assert!(!sms("a").is_message_empty());
    }

    #[test]
    fn test_preview_wraps_body() {
        let options = RenderOptions {
            prefix: Some("GDS".to_string()),
            sender: Some("GOVUK".to_string()),
            show_sender: true,
            show_recipient: true,
            ..RenderOptions::default()
        };
        let template = SmsPreviewTemplate::new(
            TemplateSpec::sms("Hello ((name))\nVisit gov.uk"),
            options,
        )
        .unwrap()
        .with_values(Personalisation::new().with("phone number", "07700 900000"));

        let rendered = template.to_string();
        assert!(rendered.starts_with("<p class=\"sms-message-recipient\">To: 07700 900000</p>\n"));
        assert!(rendered.contains("<span class=\"sms-message-sender\">From: GOVUK</span>"));
        assert!(rendered.contains("GDS: Hello <span class='placeholder'>((name))</span><br>Visit <a "));
        assert!(rendered.contains("href=\"http://gov.uk\""));
        assert!(rendered.ends_with("</a></div>"));
    }

    #[test]
    fn test_preview_recipient_placeholder() {
        let options = RenderOptions {
            show_recipient: true,
            ..RenderOptions::default()
        };
        let template = SmsPreviewTemplate::new(TemplateSpec::sms("Hi"), options).unwrap();
        assert!(template
            .to_string()
            .contains("To: <span class='placeholder-no-brackets'>phone number</span>"));
    }

    #[test]
    fn test_body_preview_single_line_and_redacted() {
        let template = SmsBodyPreviewTemplate::new(
            TemplateSpec::sms("Hello ((name)),\n\nyour <b>code</b> is ((code))"),
            RenderOptions::default(),
        )
        .unwrap()
        .with_values(Personalisation::new().with("code", "1234"));
        assert_eq!(
            template.to_string(),
            "Hello , your &lt;b&gt;code&lt;/b&gt; is 1234"
        );
    }

    #[test]
    fn test_round_trip_without_placeholders() {
        let content = "Line one\n\nLine two";
        assert_eq!(sms(content).to_string(), content);
    }

    #[test]
    fn test_conditional_with_nested_placeholder() {
        let content = "Hi.((show?? Dear ((name)).))";
        let shown = Personalisation::new().with("show", true).with("name", "Jo");
        let hidden = Personalisation::new().with("show", false).with("name", "Jo");

        let template = sms(content).with_values(shown);
        assert_eq!(template.to_string(), "Hi. Dear Jo.");
        assert_eq!(template.placeholders(), vec!["show", "name"]);
        assert_eq!(sms(content).with_values(hidden).to_string(), "Hi.");
        assert_eq!(sms(content).to_string(), "Hi.");
    }

    #[test]
    fn test_preview_resolves_names_with_markup_characters() {
        let values = Personalisation::new().with("a&b", "X");
        let message = sms("((a&b))").with_values(values.clone());
        let preview = SmsPreviewTemplate::new(TemplateSpec::sms("((a&b))"), RenderOptions::default())
            .unwrap()
            .with_values(values);
        assert_eq!(message.to_string(), "X");
        assert_eq!(preview.to_string(), "<div class=\"sms-message-wrapper\">X</div>");
    }
}
