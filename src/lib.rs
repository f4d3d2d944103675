// Rendering core
pub mod encoding;
pub mod field;
pub mod formatters;
pub mod links;
pub mod markdown;
pub mod template;

// Supporting modules
pub mod config;
pub mod error;
pub mod telemetry;

pub use error::{AppError, Result};
pub use template::{
    render, AnyTemplate, Personalisation, RenderOptions, RenderedContent, TemplateError,
    TemplateKind, TemplateSpec, TemplateType,
};
