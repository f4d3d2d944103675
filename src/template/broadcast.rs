//! Cell broadcast message and preview templates

use std::fmt;

use super::options::RenderOptions;
use super::personalisation::Personalisation;
use super::sms::{downgrade, plain_body, preview_body, Measured};
use super::traits::{Capabilities, SmsSizable, Template, TemplateBase};
use super::types::{TemplateError, TemplateResult, TemplateSpec, TemplateType};
use crate::encoding::{
    broadcast_fragment_count, non_gsm_characters, EncodedLength, SmsEncoding,
};

const ALERT_ICON: &str = "<svg class=\"broadcast-message-heading__icon\" xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 24 24\" aria-hidden=\"true\" focusable=\"false\"><path d=\"M12 2 1 21h22L12 2zm1 16h-2v-2h2v2zm0-4h-2V9h2v5z\"/></svg>";

fn broadcast_encoded(base: &TemplateBase) -> EncodedLength {
    Measured::of(base).encoded()
}

fn broadcast_too_long(base: &TemplateBase) -> bool {
    let length = broadcast_encoded(base);
    length.units > length.encoding.broadcast_capacity()
}

/// Broadcast sizing queries beyond [`SmsSizable`]
macro_rules! broadcast_sizing {
    ($variant:ty) => {
        impl $variant {
            /// Most units this message may carry given its encoding
            pub fn max_content_count(&self) -> usize {
                self.encoding().broadcast_capacity()
            }

            /// Distinct characters forcing UCS-2, in order of appearance
            pub fn non_gsm_characters(&self) -> Vec<char> {
                non_gsm_characters(&Measured::of(&self.base).body)
            }

            pub fn content_too_long(&self) -> bool {
                broadcast_too_long(&self.base)
            }
        }

        impl SmsSizable for $variant {
            fn encoding(&self) -> SmsEncoding {
                broadcast_encoded(&self.base).encoding
            }

            fn encoded_content_count(&self) -> usize {
                broadcast_encoded(&self.base).units
            }

            fn fragment_count(&self) -> usize {
                let length = broadcast_encoded(&self.base);
                broadcast_fragment_count(length.units, length.encoding)
            }
        }
    };
}

/// The text sent to handsets in a cell broadcast
#[derive(Debug, Clone, PartialEq)]
pub struct BroadcastMessageTemplate {
    base: TemplateBase,
}

impl BroadcastMessageTemplate {
    pub const NAME: &'static str = "BroadcastMessageTemplate";

    pub fn new(spec: TemplateSpec, options: RenderOptions) -> TemplateResult<Self> {
        Ok(Self {
            base: TemplateBase::new(Self::NAME, TemplateType::Broadcast, spec, options)?,
        })
    }

    pub fn with_values(mut self, values: Personalisation) -> Self {
        self.base.values = values;
        self
    }

    /// Build directly from message text
    pub fn from_content(content: impl Into<String>) -> Self {
        Self {
            base: TemplateBase {
                spec: TemplateSpec::broadcast(content),
                options: RenderOptions::default(),
                values: Personalisation::new(),
            },
        }
    }

    /// Build from a broadcast event, reading
    /// `transmitted_content.body`
    pub fn from_event(event: &serde_json::Value) -> TemplateResult<Self> {
        let body = event
            .get("transmitted_content")
            .and_then(|content| content.get("body"))
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| {
                TemplateError::InvalidEvent("missing transmitted_content.body".to_string())
            })?;
        Ok(Self::from_content(body))
    }
}

impl fmt::Display for BroadcastMessageTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&downgrade(&self.base, plain_body(&self.base)))
    }
}

impl Template for BroadcastMessageTemplate {
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
        Measured::of(&self.base).characters()
    }

    fn is_message_empty(&self) -> bool {
        self.content_count() == 0
    }

    fn is_message_too_long(&self) -> bool {
        broadcast_too_long(&self.base)
    }
}

broadcast_sizing!(BroadcastMessageTemplate);

/// In-app preview of a broadcast under an "Emergency alert" heading
#[derive(Debug, Clone, PartialEq)]
pub struct BroadcastPreviewTemplate {
    base: TemplateBase,
}

impl BroadcastPreviewTemplate {
    pub const NAME: &'static str = "BroadcastPreviewTemplate";

    pub fn new(spec: TemplateSpec, options: RenderOptions) -> TemplateResult<Self> {
        Ok(Self {
            base: TemplateBase::new(Self::NAME, TemplateType::Broadcast, spec, options)?,
        })
    }

    pub fn with_values(mut self, values: Personalisation) -> Self {
        self.base.values = values;
        self
    }
}

impl fmt::Display for BroadcastPreviewTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<div class=\"broadcast-message-wrapper\"><h2 class=\"broadcast-message-heading\">{}Emergency alert</h2>{}</div>",
            ALERT_ICON,
            preview_body(&self.base, None)
        )
    }
}

impl Template for BroadcastPreviewTemplate {
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
        Measured::of(&self.base).characters()
    }

    fn is_message_empty(&self) -> bool {
        self.content_count() == 0
    }

    fn is_message_too_long(&self) -> bool {
        broadcast_too_long(&self.base)
    }
}

broadcast_sizing!(BroadcastPreviewTemplate);
