//! Plain-text, HTML and preview email templates.
//!
//! All three share the same personalised body. The plain-text variant
//! renders markdown as text, the HTML variant as an inline-styled document
//! and the preview as that body beneath a sender and subject table.

use std::collections::HashSet;
use std::fmt;

use super::options::RenderOptions;
use super::personalisation::Personalisation;
use super::traits::{Capabilities, HasSubject, Template, TemplateBase};
use super::types::{TemplateResult, TemplateSpec, TemplateType};
use crate::field::{self, Field, HtmlMode, PlaceholderStyle};
use crate::formatters::{escape_html, nice_typography, normalise_lines, normalise_whitespace};
use crate::links::{autolink, LinkStyle};
use crate::markdown::{email_html, email_plain_text};

/// Largest personalised body, in bytes, an email may carry
pub const EMAIL_MAX_CONTENT_BYTES: usize = 2_000_000;

/// Characters of plain text shown in the hidden inbox preheader
const PREHEADER_LENGTH: usize = 256;

const GOVUK_BANNER: &str = "<table role=\"presentation\" width=\"100%\" style=\"border-collapse: collapse; min-width: 100%; width: 100% !important;\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\"><tr><td width=\"100%\" height=\"53\" bgcolor=\"#0b0c0c\"><span style=\"font-family: Helvetica, Arial, sans-serif; font-weight: 700; color: #ffffff; font-size: 28px; line-height: 1.315789474; padding: 10px 15px; display: inline-block;\">GOV.UK</span></td></tr></table>";

fn escape_attribute(value: &str) -> String {
    escape_html(value).replace('"', "&quot;")
}

fn check_email(
    variant: &'static str,
    spec: TemplateSpec,
    options: RenderOptions,
) -> TemplateResult<TemplateBase> {
    TemplateBase::new(variant, TemplateType::Email, spec, options)
}

/// Subject placeholders first, then content, without duplicates
fn email_placeholders(base: &TemplateBase) -> Vec<String> {
    let subject = base.spec.subject.as_deref().unwrap_or_default();
    let mut seen = HashSet::new();
    field::placeholders(subject)
        .into_iter()
        .chain(field::placeholders(&base.spec.content))
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

fn render_subject(base: &TemplateBase, html: HtmlMode, style: PlaceholderStyle) -> String {
    let subject = base.spec.subject.as_deref().unwrap_or_default();
    let rendered = Field::new(subject, &base.values)
        .html(html)
        .style(style)
        .redact_missing(base.options.redact_missing_personalisation)
        .render();
    let skip_markup = html != HtmlMode::Passthrough;
    normalise_whitespace(&nice_typography(&rendered, skip_markup))
}

/// Personalised content before markdown, as counted and measured
fn personalised_content(base: &TemplateBase) -> String {
    let field = Field::new(&base.spec.content, &base.values)
        .html(HtmlMode::Passthrough)
        .style(PlaceholderStyle::Plain)
        .markdown_lists(true)
        .redact_missing(base.options.redact_missing_personalisation);
    normalise_lines(&field.render())
}

fn plain_text_body(base: &TemplateBase) -> String {
    email_plain_text(&nice_typography(&personalised_content(base), false))
}

fn html_body(base: &TemplateBase, links: LinkStyle) -> String {
    let field = Field::new(&base.spec.content, &base.values)
        .html(HtmlMode::Escape)
        .markdown_lists(true)
        .redact_missing(base.options.redact_missing_personalisation);
    let body = nice_typography(&normalise_lines(&field.render()), true);
    email_html(&autolink(&body, links, false))
}

fn content_count(base: &TemplateBase) -> usize {
    personalised_content(base).chars().count()
}

fn content_size_in_bytes(base: &TemplateBase) -> usize {
    personalised_content(base).len()
}

macro_rules! email_variant {
    ($variant:ty, $capabilities:expr, $html:expr, $style:expr) => {
        impl $variant {
            pub fn new(spec: TemplateSpec, options: RenderOptions) -> TemplateResult<Self> {
                Ok(Self {
                    base: check_email(Self::NAME, spec, options)?,
                })
            }

            pub fn with_values(mut self, values: Personalisation) -> Self {
                self.base.values = values;
                self
            }

            /// UTF-8 size of the personalised body
            pub fn content_size_in_bytes(&self) -> usize {
                content_size_in_bytes(&self.base)
            }
        }

        impl Template for $variant {
            fn variant_name(&self) -> &'static str {
                Self::NAME
            }

            fn capabilities(&self) -> Capabilities {
                $capabilities
            }

            fn base(&self) -> &TemplateBase {
                &self.base
            }

            fn base_mut(&mut self) -> &mut TemplateBase {
                &mut self.base
            }

            fn placeholders(&self) -> Vec<String> {
                email_placeholders(&self.base)
            }

            fn content_count(&self) -> usize {
                content_count(&self.base)
            }

            fn is_message_empty(&self) -> bool {
                content_count(&self.base) == 0
            }

            fn is_message_too_long(&self) -> bool {
                content_size_in_bytes(&self.base) > EMAIL_MAX_CONTENT_BYTES
            }
        }

        impl HasSubject for $variant {
            fn subject(&self) -> String {
                render_subject(&self.base, $html, $style)
            }
        }
    };
}

/// Multipart plain-text alternative of an email
#[derive(Debug, Clone, PartialEq)]
pub struct PlainTextEmailTemplate {
    base: TemplateBase,
}

impl PlainTextEmailTemplate {
    pub const NAME: &'static str = "PlainTextEmailTemplate";
}

email_variant!(
    PlainTextEmailTemplate,
    Capabilities {
        has_subject: true,
        is_sms_like: false,
        is_preview: false,
    },
    HtmlMode::Passthrough,
    PlaceholderStyle::Plain
);

impl fmt::Display for PlainTextEmailTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&plain_text_body(&self.base))
    }
}

/// HTML email as sent
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlEmailTemplate {
    base: TemplateBase,
}

impl HtmlEmailTemplate {
    pub const NAME: &'static str = "HTMLEmailTemplate";

    fn preheader(&self) -> String {
        let text = normalise_whitespace(&plain_text_body(&self.base));
        escape_html(&text.chars().take(PREHEADER_LENGTH).collect::<String>())
    }

    fn brand_block(&self) -> String {
        let options = &self.base.options;
        let mut block = String::new();

        let logo = options.brand_logo.as_deref().map(|logo| {
            format!(
                "<img src=\"{}\" alt=\"{}\" height=\"108\" style=\"display: block; border: 0;\">",
                escape_attribute(logo),
                escape_attribute(options.brand_name.as_deref().unwrap_or_default())
            )
        });
        let text = options.brand_text.as_deref().map(|text| {
            format!(
                "<span style=\"font-family: Helvetica, Arial, sans-serif; font-size: 19px; line-height: 1.315789474;\">{}</span>",
                escape_html(text)
            )
        });
        if logo.is_none() && text.is_none() {
            return block;
        }

        let background = options
            .brand_colour
            .as_deref()
            .filter(|_| options.brand_banner)
            .map(|colour| format!(" bgcolor=\"{}\"", escape_attribute(colour)))
            .unwrap_or_default();
        block.push_str(&format!(
            "<table role=\"presentation\" width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\"><tr><td{} style=\"padding: 10px 15px;\">{}{}</td></tr></table>",
            background,
            logo.unwrap_or_default(),
            text.unwrap_or_default()
        ));

        if !options.brand_banner {
            if let Some(colour) = options.brand_colour.as_deref() {
                block.push_str(&format!(
                    "<table role=\"presentation\" width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\"><tr><td height=\"8\" bgcolor=\"{}\"></td></tr></table>",
                    escape_attribute(colour)
                ));
            }
        }
        block
    }

    /// GOV.UK banner unless a brand banner replaces it, then any brand block
    fn banner(&self) -> String {
        let options = &self.base.options;
        let mut banner = String::new();
        if options.govuk_banner && !options.brand_banner {
            banner.push_str(GOVUK_BANNER);
        }
        banner.push_str(&self.brand_block());
        banner
    }
}

email_variant!(
    HtmlEmailTemplate,
    Capabilities {
        has_subject: true,
        is_sms_like: false,
        is_preview: false,
    },
    HtmlMode::Escape,
    PlaceholderStyle::Plain
);

impl fmt::Display for HtmlEmailTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = html_body(&self.base, LinkStyle::Email);
        if !self.base.options.complete_html {
            return f.write_str(&body);
        }

        writeln!(f, "<!DOCTYPE html>")?;
        writeln!(f, "<html lang=\"en\">")?;
        writeln!(f, "<head>")?;
        writeln!(f, "<meta http-equiv=\"Content-Type\" content=\"text/html; charset=utf-8\">")?;
        writeln!(f, "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">")?;
        writeln!(f, "<title>{}</title>", self.subject())?;
        writeln!(f, "</head>")?;
        writeln!(
            f,
            "<body style=\"font-family: Helvetica, Arial, sans-serif; font-size: 16px; margin: 0; color: #0b0c0c;\">"
        )?;
        writeln!(
            f,
            "<span style=\"display: none; font-size: 1px; color: #fff; max-height: 0;\" hidden>{}</span>",
            self.preheader()
        )?;
        let banner = self.banner();
        if !banner.is_empty() {
            writeln!(f, "{}", banner)?;
        }
        writeln!(
            f,
            "<table role=\"presentation\" class=\"content\" align=\"center\" style=\"border-collapse: collapse; max-width: 580px; width: 100% !important;\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\"><tr><td style=\"font-family: Helvetica, Arial, sans-serif; font-size: 19px; line-height: 1.315789474; padding: 30px 10px;\">"
        )?;
        writeln!(f, "{}", body)?;
        writeln!(f, "</td></tr></table>")?;
        writeln!(f, "</body>")?;
        write!(f, "</html>")
    }
}

/// In-app preview of an email with its sending metadata
#[derive(Debug, Clone, PartialEq)]
pub struct EmailPreviewTemplate {
    base: TemplateBase,
}

impl EmailPreviewTemplate {
    pub const NAME: &'static str = "EmailPreviewTemplate";

    fn from_line(&self) -> Option<String> {
        let options = &self.base.options;
        let name = options.from_name.as_deref().filter(|name| !name.is_empty());
        let address = options
            .from_address
            .as_deref()
            .filter(|address| !address.is_empty());
        match (name, address) {
            (Some(name), Some(address)) => Some(format!(
                "{} &lt;{}&gt;",
                escape_html(name),
                escape_html(address)
            )),
            (Some(only), None) | (None, Some(only)) => Some(escape_html(only)),
            (None, None) => None,
        }
    }

    fn recipient(&self) -> String {
        Field::new("((email address))", &self.base.values)
            .style(PlaceholderStyle::NoBrackets)
            .render()
    }
}

email_variant!(
    EmailPreviewTemplate,
    Capabilities {
        has_subject: true,
        is_sms_like: false,
        is_preview: true,
    },
    HtmlMode::Escape,
    PlaceholderStyle::Highlighted
);

fn meta_row(f: &mut fmt::Formatter<'_>, heading: &str, value: &str) -> fmt::Result {
    writeln!(
        f,
        "<tr><th class=\"email-message-meta__key\">{}</th><td class=\"email-message-meta__value\">{}</td></tr>",
        heading, value
    )
}

impl fmt::Display for EmailPreviewTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<table class=\"email-message-meta\"><tbody>")?;
        if let Some(from) = self.from_line() {
            meta_row(f, "From", &from)?;
        }
        if let Some(reply_to) = self.base.options.reply_to.as_deref() {
            meta_row(f, "Reply&nbsp;to", &escape_html(reply_to))?;
        }
        if self.base.options.show_recipient {
            meta_row(f, "To", &self.recipient())?;
        }
        meta_row(f, "Subject", &self.subject())?;
        writeln!(f, "</tbody></table>")?;
        write!(
            f,
            "<div class=\"email-message-body\">{}</div>",
            html_body(&self.base, LinkStyle::Preview)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateError;
    use pretty_assertions::assert_eq;

    fn email(subject: &str, content: &str) -> TemplateSpec {
        TemplateSpec::email(subject, content)
    }

    fn plain(subject: &str, content: &str) -> PlainTextEmailTemplate {
        PlainTextEmailTemplate::new(email(subject, content), RenderOptions::default()).unwrap()
    }

    fn html(subject: &str, content: &str, options: RenderOptions) -> HtmlEmailTemplate {
        HtmlEmailTemplate::new(email(subject, content), options).unwrap()
    }

    #[test]
    fn test_rejects_sms_template_type() {
        let result = HtmlEmailTemplate::new(TemplateSpec::sms("hi"), RenderOptions::default());
        assert_eq!(
            result.unwrap_err(),
            TemplateError::InvalidTemplateType {
                variant: "HTMLEmailTemplate",
                template_type: TemplateType::Sms,
            }
        );
    }

    #[test]
    fn test_subject_placeholders_listed_first() {
        let template = plain("((a)) and ((b))", "((b)) then ((c))");
        assert_eq!(template.placeholders(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_byte_size_cap() {
        assert!(!plain("s", &"a".repeat(1_999_999)).is_message_too_long());
        assert!(!plain("s", &"a".repeat(2_000_000)).is_message_too_long());
        assert!(plain("s", &"a".repeat(2_000_001)).is_message_too_long());
    }

    #[test]
    fn test_byte_size_counts_utf8() {
        let template = plain("s", &"é".repeat(1_000_001));
        assert_eq!(template.content_count(), 1_000_001);
        assert_eq!(template.content_size_in_bytes(), 2_000_002);
        assert!(template.is_message_too_long());
    }

    #[test]
    fn test_content_count_ignores_subject() {
        let template = plain("A long subject line", "  ((name))  ")
            .with_values(Personalisation::new().with("name", " "));
        assert_eq!(template.content_count(), 0);
        assert!(template.is_message_empty());
    }

    #[test]
    fn test_smart_quotes_leave_email_addresses_alone() {
        let template = plain(
            "Email o'brien@example.com - it's ready",
            "Don't forget o'brien@example.com",
        );
        assert_eq!(
            template.subject(),
            "Email o'brien@example.com \u{2013} it\u{2019}s ready"
        );
        assert_eq!(template.to_string(), "Don\u{2019}t forget o'brien@example.com");
    }

    #[test]
    fn test_subject_whitespace_collapsed() {
        let template = plain("Line one\n\nLine   ((two))", "body")
            .with_values(Personalisation::new().with("two", "two"));
        assert_eq!(template.subject(), "Line one Line two");
        assert_eq!(template.raw_subject(), "Line one\n\nLine   ((two))");
    }

    #[test]
    fn test_plain_text_markdown() {
        let template = plain("s", "# Heading\n\n* one\n* two");
        assert_eq!(
            template.to_string(),
            format!("Heading\n{}\n\n• one\n• two", "-".repeat(65))
        );
    }

    #[test]
    fn test_list_personalisation_becomes_bullets() {
        let template = plain("s", "You need:\n((items))\nThanks")
            .with_values(Personalisation::new().with("items", vec!["a", "b"]));
        assert_eq!(template.to_string(), "You need:\n\n• a\n• b\n\nThanks");
    }

    #[test]
    fn test_html_complete_document() {
        let template = html("Your ((thing))", "Hello", RenderOptions::default())
            .with_values(Personalisation::new().with("thing", "<licence>"));
        let rendered = template.to_string();
        assert!(rendered.starts_with("<!DOCTYPE html>\n"));
        assert!(rendered.contains("<title>Your &lt;licence&gt;</title>"));
        assert!(rendered.contains(GOVUK_BANNER));
        assert!(rendered.ends_with("</html>"));
    }

    #[test]
    fn test_html_fragment_only() {
        let options = RenderOptions {
            complete_html: false,
            ..RenderOptions::default()
        };
        let rendered = html("s", "Hello <b>world</b>", options).to_string();
        assert!(rendered.starts_with("<p style=\""));
        assert!(rendered.contains("Hello &lt;b&gt;world&lt;/b&gt;"));
        assert!(!rendered.contains("<!DOCTYPE"));
    }

    #[test]
    fn test_html_preheader_truncated() {
        let rendered = html("s", &"a".repeat(300), RenderOptions::default()).to_string();
        assert!(rendered.contains(&format!(" hidden>{}</span>", "a".repeat(256))));
    }

    #[test]
    fn test_html_links() {
        let options = RenderOptions {
            complete_html: false,
            ..RenderOptions::default()
        };
        let rendered = html("s", "Apply at https://www.gov.uk/apply.", options).to_string();
        assert!(rendered.contains(
            "<a style=\"word-wrap: break-word; color: #1D70B8;\" href=\"https://www.gov.uk/apply\">https://www.gov.uk/apply</a>."
        ));
    }

    #[test]
    fn test_brand_banner_replaces_govuk_banner() {
        let options = RenderOptions {
            brand_banner: true,
            brand_colour: Some("#f00".to_string()),
            brand_text: Some("Department".to_string()),
            ..RenderOptions::default()
        };
        let rendered = html("s", "body", options).to_string();
        assert!(!rendered.contains(GOVUK_BANNER));
        assert!(rendered.contains("bgcolor=\"#f00\" style=\"padding: 10px 15px;\">"));
        assert!(rendered.contains(">Department</span>"));
    }

    #[test]
    fn test_brand_colour_stripe_below_govuk_banner() {
        let options = RenderOptions {
            brand_colour: Some("#0b0".to_string()),
            brand_logo: Some("https://example.com/logo.png".to_string()),
            ..RenderOptions::default()
        };
        let rendered = html("s", "body", options).to_string();
        assert!(rendered.contains("<img src=\"https://example.com/logo.png\""));
        assert!(rendered.contains("<td height=\"8\" bgcolor=\"#0b0\"></td>"));
        assert!(!rendered.contains("bgcolor=\"#0b0\" style="));
    }

    #[test]
    fn test_preview_metadata() {
        let options = RenderOptions {
            from_name: Some("Department".to_string()),
            from_address: Some("test@example.com".to_string()),
            reply_to: Some("reply@example.com".to_string()),
            show_recipient: true,
            ..RenderOptions::default()
        };
        let template = EmailPreviewTemplate::new(email("Hi ((name))", "Body"), options).unwrap();
        let rendered = template.to_string();
        assert!(rendered.contains(">Department &lt;test@example.com&gt;</td>"));
        assert!(rendered.contains(">Reply&nbsp;to</th>"));
        assert!(rendered.contains("<span class='placeholder-no-brackets'>email address</span>"));
        assert!(rendered.contains(">Hi <span class='placeholder'>((name))</span></td>"));
        assert!(rendered.contains("<div class=\"email-message-body\"><p style="));
    }
}
