//! Closed set of concrete variants and dispatch over them

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::broadcast::{BroadcastMessageTemplate, BroadcastPreviewTemplate};
use super::email::{EmailPreviewTemplate, HtmlEmailTemplate, PlainTextEmailTemplate};
use super::options::RenderOptions;
use super::personalisation::Personalisation;
use super::sms::{SmsBodyPreviewTemplate, SmsMessageTemplate, SmsPreviewTemplate};
use super::traits::{Capabilities, HasSubject, SmsSizable, Template};
use super::types::{RenderedContent, TemplateError, TemplateResult, TemplateSpec, TemplateType};

/// Names of the partial bases, none of which can render on its own
const ABSTRACT_BASES: [&str; 4] = [
    "Template",
    "BaseSMSTemplate",
    "BaseEmailTemplate",
    "BaseBroadcastTemplate",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateKind {
    SmsMessage,
    SmsPreview,
    SmsBodyPreview,
    BroadcastMessage,
    BroadcastPreview,
    PlainTextEmail,
    HtmlEmail,
    EmailPreview,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 8] = [
        TemplateKind::SmsMessage,
        TemplateKind::SmsPreview,
        TemplateKind::SmsBodyPreview,
        TemplateKind::BroadcastMessage,
        TemplateKind::BroadcastPreview,
        TemplateKind::PlainTextEmail,
        TemplateKind::HtmlEmail,
        TemplateKind::EmailPreview,
    ];

    /// Resolve a variant by type name (`SMSPreviewTemplate`) or kebab-case
    /// name (`sms-preview`)
    pub fn from_name(name: &str) -> TemplateResult<Self> {
        if ABSTRACT_BASES.contains(&name) {
            return Err(TemplateError::MissingCapability {
                variant: name.to_string(),
                capability: "rendering",
            });
        }

        Self::ALL
            .into_iter()
            .find(|kind| kind.type_name() == name || kind.kebab_name() == name)
            .ok_or_else(|| TemplateError::UnknownVariant(name.to_string()))
    }

    pub fn type_name(self) -> &'static str {
        match self {
            TemplateKind::SmsMessage => SmsMessageTemplate::NAME,
            TemplateKind::SmsPreview => SmsPreviewTemplate::NAME,
            TemplateKind::SmsBodyPreview => SmsBodyPreviewTemplate::NAME,
            TemplateKind::BroadcastMessage => BroadcastMessageTemplate::NAME,
            TemplateKind::BroadcastPreview => BroadcastPreviewTemplate::NAME,
            TemplateKind::PlainTextEmail => PlainTextEmailTemplate::NAME,
            TemplateKind::HtmlEmail => HtmlEmailTemplate::NAME,
            TemplateKind::EmailPreview => EmailPreviewTemplate::NAME,
        }
    }

    pub fn kebab_name(self) -> &'static str {
        match self {
            TemplateKind::SmsMessage => "sms-message",
            TemplateKind::SmsPreview => "sms-preview",
            TemplateKind::SmsBodyPreview => "sms-body-preview",
            TemplateKind::BroadcastMessage => "broadcast-message",
            TemplateKind::BroadcastPreview => "broadcast-preview",
            TemplateKind::PlainTextEmail => "plain-text-email",
            TemplateKind::HtmlEmail => "html-email",
            TemplateKind::EmailPreview => "email-preview",
        }
    }

    /// Channel the variant accepts
    pub fn template_type(self) -> TemplateType {
        match self {
            TemplateKind::SmsMessage | TemplateKind::SmsPreview | TemplateKind::SmsBodyPreview => {
                TemplateType::Sms
            }
            TemplateKind::BroadcastMessage | TemplateKind::BroadcastPreview => {
                TemplateType::Broadcast
            }
            TemplateKind::PlainTextEmail
            | TemplateKind::HtmlEmail
            | TemplateKind::EmailPreview => TemplateType::Email,
        }
    }

    pub fn capabilities(self) -> Capabilities {
        let is_email = self.template_type() == TemplateType::Email;
        Capabilities {
            has_subject: is_email,
            is_sms_like: !is_email,
            is_preview: matches!(
                self,
                TemplateKind::SmsPreview
                    | TemplateKind::SmsBodyPreview
                    | TemplateKind::BroadcastPreview
                    | TemplateKind::EmailPreview
            ),
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kebab_name())
    }
}

impl FromStr for TemplateKind {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Any concrete variant, for callers that pick one at runtime
#[derive(Debug, Clone, PartialEq)]
pub enum AnyTemplate {
    SmsMessage(SmsMessageTemplate),
    SmsPreview(SmsPreviewTemplate),
    SmsBodyPreview(SmsBodyPreviewTemplate),
    BroadcastMessage(BroadcastMessageTemplate),
    BroadcastPreview(BroadcastPreviewTemplate),
    PlainTextEmail(PlainTextEmailTemplate),
    HtmlEmail(HtmlEmailTemplate),
    EmailPreview(EmailPreviewTemplate),
}

impl AnyTemplate {
    pub fn build(
        kind: TemplateKind,
        spec: TemplateSpec,
        options: RenderOptions,
        values: Personalisation,
    ) -> TemplateResult<Self> {
        let template = match kind {
            TemplateKind::SmsMessage => {
                Self::SmsMessage(SmsMessageTemplate::new(spec, options)?.with_values(values))
            }
            TemplateKind::SmsPreview => {
                Self::SmsPreview(SmsPreviewTemplate::new(spec, options)?.with_values(values))
            }
            TemplateKind::SmsBodyPreview => Self::SmsBodyPreview(
                SmsBodyPreviewTemplate::new(spec, options)?.with_values(values),
            ),
            TemplateKind::BroadcastMessage => Self::BroadcastMessage(
                BroadcastMessageTemplate::new(spec, options)?.with_values(values),
            ),
            TemplateKind::BroadcastPreview => Self::BroadcastPreview(
                BroadcastPreviewTemplate::new(spec, options)?.with_values(values),
            ),
            TemplateKind::PlainTextEmail => Self::PlainTextEmail(
                PlainTextEmailTemplate::new(spec, options)?.with_values(values),
            ),
            TemplateKind::HtmlEmail => {
                Self::HtmlEmail(HtmlEmailTemplate::new(spec, options)?.with_values(values))
            }
            TemplateKind::EmailPreview => {
                Self::EmailPreview(EmailPreviewTemplate::new(spec, options)?.with_values(values))
            }
        };
        Ok(template)
    }

    pub fn kind(&self) -> TemplateKind {
        match self {
            Self::SmsMessage(_) => TemplateKind::SmsMessage,
            Self::SmsPreview(_) => TemplateKind::SmsPreview,
            Self::SmsBodyPreview(_) => TemplateKind::SmsBodyPreview,
            Self::BroadcastMessage(_) => TemplateKind::BroadcastMessage,
            Self::BroadcastPreview(_) => TemplateKind::BroadcastPreview,
            Self::PlainTextEmail(_) => TemplateKind::PlainTextEmail,
            Self::HtmlEmail(_) => TemplateKind::HtmlEmail,
            Self::EmailPreview(_) => TemplateKind::EmailPreview,
        }
    }

    pub fn as_template(&self) -> &dyn Template {
        match self {
            Self::SmsMessage(t) => t,
            Self::SmsPreview(t) => t,
            Self::SmsBodyPreview(t) => t,
            Self::BroadcastMessage(t) => t,
            Self::BroadcastPreview(t) => t,
            Self::PlainTextEmail(t) => t,
            Self::HtmlEmail(t) => t,
            Self::EmailPreview(t) => t,
        }
    }

    /// SMS-style sizing, for SMS-like variants only
    pub fn as_sms(&self) -> Option<&dyn SmsSizable> {
        match self {
            Self::SmsMessage(t) => Some(t),
            Self::SmsPreview(t) => Some(t),
            Self::SmsBodyPreview(t) => Some(t),
            Self::BroadcastMessage(t) => Some(t),
            Self::BroadcastPreview(t) => Some(t),
            _ => None,
        }
    }

    /// Subject access, for email variants only
    pub fn as_subject(&self) -> Option<&dyn HasSubject> {
        match self {
            Self::PlainTextEmail(t) => Some(t),
            Self::HtmlEmail(t) => Some(t),
            Self::EmailPreview(t) => Some(t),
            _ => None,
        }
    }
}

/// Rendered output with the queries callers usually need alongside it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSummary {
    pub variant: TemplateKind,
    pub rendered: RenderedContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub placeholders: Vec<String>,
    pub content_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragment_count: Option<usize>,
    pub is_message_too_long: bool,
    pub is_message_empty: bool,
}

impl AnyTemplate {
    pub fn summary(&self) -> RenderSummary {
        let template = self.as_template();
        RenderSummary {
            variant: self.kind(),
            rendered: template.render(),
            subject: self.as_subject().map(|t| t.subject()),
            placeholders: template.placeholders(),
            content_count: template.content_count(),
            fragment_count: self.as_sms().map(|t| t.fragment_count()),
            is_message_too_long: template.is_message_too_long(),
            is_message_empty: template.is_message_empty(),
        }
    }
}

impl fmt::Display for AnyTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_template(), f)
    }
}

/// Render one template with one set of values.
///
/// Pure: the same inputs always give the same output and nothing is
/// retained between calls.
pub fn render(
    kind: TemplateKind,
    spec: &TemplateSpec,
    options: &RenderOptions,
    values: &Personalisation,
) -> TemplateResult<RenderedContent> {
    let template = AnyTemplate::build(kind, spec.clone(), options.clone(), values.clone())?;
    Ok(template.as_template().render())
}
