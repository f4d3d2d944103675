//! Template rendering.
//!
//! This module provides:
//! - `TemplateSpec` records and their JSON validation
//! - Personalisation values and per-render options
//! - Eight concrete variants across the SMS, broadcast and email channels
//! - Capability traits (`HasSubject`, `SmsSizable`) shared across them
//! - A closed `TemplateKind` enum and a pure `render` entry point
//!
//! # Example
//!
//! ```ignore
//! let spec = TemplateSpec::sms("Your code is ((code))");
//! let values = Personalisation::new().with("code", "1234");
//!
//! let template = SmsMessageTemplate::new(spec, RenderOptions::default())?
//!     .with_values(values);
//!
//! assert_eq!(template.to_string(), "Your code is 1234");
//! assert_eq!(template.fragment_count(), 1);
//! ```

mod broadcast;
mod email;
mod kind;
mod options;
mod personalisation;
mod sms;
mod traits;
mod types;

pub use broadcast::{BroadcastMessageTemplate, BroadcastPreviewTemplate};
pub use email::{
    EmailPreviewTemplate, HtmlEmailTemplate, PlainTextEmailTemplate, EMAIL_MAX_CONTENT_BYTES,
};
pub use kind::{render, AnyTemplate, RenderSummary, TemplateKind};
pub use options::RenderOptions;
pub use personalisation::{Personalisation, PersonalisationValue};
pub use sms::{SmsBodyPreviewTemplate, SmsMessageTemplate, SmsPreviewTemplate};
pub use traits::{Capabilities, HasSubject, SmsSizable, Template, TemplateBase};
pub use types::{RenderedContent, TemplateError, TemplateResult, TemplateSpec, TemplateType};
