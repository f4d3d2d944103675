//! Template types and error definitions

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Template-specific error type
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Cannot initialise {variant} with {template_type} template_type")]
    InvalidTemplateType {
        variant: &'static str,
        template_type: TemplateType,
    },

    #[error("Cannot initialise {variant}: it has no {capability} capability")]
    MissingCapability {
        variant: String,
        capability: &'static str,
    },

    #[error("Unknown template variant: {0}")]
    UnknownVariant(String),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Invalid broadcast event: {0}")]
    InvalidEvent(String),
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Channel a stored template was written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateType {
    Sms,
    Email,
    Broadcast,
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TemplateType::Sms => "sms",
            TemplateType::Email => "email",
            TemplateType::Broadcast => "broadcast",
        };
        f.write_str(name)
    }
}

/// A stored template as handed to a renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateSpec {
    /// Body with `((placeholder))` markers
    pub content: String,

    /// Subject line, only meaningful for email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    pub template_type: TemplateType,
}

impl TemplateSpec {
    pub fn new(content: impl Into<String>, template_type: TemplateType) -> Self {
        Self {
            content: content.into(),
            subject: None,
            template_type,
        }
    }

    pub fn sms(content: impl Into<String>) -> Self {
        Self::new(content, TemplateType::Sms)
    }

    pub fn broadcast(content: impl Into<String>) -> Self {
        Self::new(content, TemplateType::Broadcast)
    }

    pub fn email(subject: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            subject: Some(subject.into()),
            template_type: TemplateType::Email,
        }
    }

    /// Parse and validate a JSON template record.
    ///
    /// Unknown keys, a missing `content` or `template_type`, and an email
    /// record without a `subject` are all rejected.
    pub fn from_json(record: &serde_json::Value) -> TemplateResult<Self> {
        let spec: TemplateSpec = serde_json::from_value(record.clone())
            .map_err(|e| TemplateError::InvalidTemplate(e.to_string()))?;

        if spec.template_type == TemplateType::Email && spec.subject.is_none() {
            return Err(TemplateError::InvalidTemplate(
                "Email templates require a subject".to_string(),
            ));
        }

        Ok(spec)
    }
}

/// Output of a single render call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RenderedContent(String);

impl RenderedContent {
    pub fn new(content: String) -> Self {
        Self(content)
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for RenderedContent {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RenderedContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for RenderedContent {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
