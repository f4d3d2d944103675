//! Capability traits shared by the template variants

use std::fmt;

use super::options::RenderOptions;
use super::personalisation::Personalisation;
use super::types::{RenderedContent, TemplateError, TemplateResult, TemplateSpec, TemplateType};
use crate::encoding::SmsEncoding;
use crate::field;

/// What a variant can do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub has_subject: bool,
    pub is_sms_like: bool,
    pub is_preview: bool,
}

/// State every variant carries: the stored template, its options and the
/// personalisation assigned so far
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateBase {
    pub spec: TemplateSpec,
    pub options: RenderOptions,
    pub values: Personalisation,
}

impl TemplateBase {
    /// Check the stored template belongs to the variant's channel before building
    pub fn new(
        variant: &'static str,
        expected: TemplateType,
        spec: TemplateSpec,
        options: RenderOptions,
    ) -> TemplateResult<Self> {
        if spec.template_type != expected {
            tracing::debug!(
                variant,
                template_type = %spec.template_type,
                "Rejected template for variant"
            );
            return Err(TemplateError::InvalidTemplateType {
                variant,
                template_type: spec.template_type,
            });
        }
        Ok(Self {
            spec,
            options,
            values: Personalisation::new(),
        })
    }
}

/// A renderable template variant.
///
/// `Display` produces the channel-specific output; every call renders from
/// the current spec, options and values with nothing cached in between.
pub trait Template: fmt::Display {
    /// Name reported in errors and logs
    fn variant_name(&self) -> &'static str;

    fn capabilities(&self) -> Capabilities;

    fn base(&self) -> &TemplateBase;

    fn base_mut(&mut self) -> &mut TemplateBase;

    fn spec(&self) -> &TemplateSpec {
        &self.base().spec
    }

    fn options(&self) -> &RenderOptions {
        &self.base().options
    }

    fn options_mut(&mut self) -> &mut RenderOptions {
        &mut self.base_mut().options
    }

    fn values(&self) -> &Personalisation {
        &self.base().values
    }

    fn set_values(&mut self, values: Personalisation) {
        self.base_mut().values = values;
    }

    /// Placeholder names in order of first appearance
    fn placeholders(&self) -> Vec<String> {
        field::placeholders(&self.spec().content)
    }

    /// Characters in the personalised content
    fn content_count(&self) -> usize;

    /// Whether the personalised content has nothing but whitespace
    fn is_message_empty(&self) -> bool;

    fn is_message_too_long(&self) -> bool;

    fn render(&self) -> RenderedContent {
        RenderedContent::new(self.to_string())
    }
}

/// Variants with a subject line
pub trait HasSubject: Template {
    /// Subject with placeholders substituted and whitespace collapsed
    fn subject(&self) -> String;

    fn raw_subject(&self) -> &str {
        self.spec().subject.as_deref().unwrap_or_default()
    }
}

/// Variants sized in SMS-style transport units
pub trait SmsSizable: Template {
    /// Encoding the whole message needs
    fn encoding(&self) -> SmsEncoding;

    /// Units on the wire: extended characters count twice in GSM-7
    fn encoded_content_count(&self) -> usize;

    /// Physical parts needed to carry the message
    fn fragment_count(&self) -> usize;
}
