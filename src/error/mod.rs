use thiserror::Error;

use crate::telemetry::TelemetryError;
use crate::template::TemplateError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Invalid input: {0}")]
    Input(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

/// Result type for crate-level operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Check if running in production mode (based on RUN_MODE env var)
pub fn is_production() -> bool {
    std::env::var("RUN_MODE")
        .map(|m| m == "production" || m == "prod")
        .unwrap_or(false)
}

impl AppError {
    /// Stable code for machine-readable error output
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Template(TemplateError::InvalidTemplateType { .. })
            | AppError::Template(TemplateError::MissingCapability { .. }) => "TYPE_ERROR",
            AppError::Template(TemplateError::UnknownVariant(_)) => "UNKNOWN_VARIANT",
            AppError::Template(_) | AppError::Input(_) => "VALIDATION_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Telemetry(_) => "TELEMETRY_ERROR",
        }
    }

    /// Message safe to show outside the process; configuration details are
    /// withheld in production
    pub fn client_message(&self) -> String {
        match self {
            AppError::Config(_) if is_production() => "Configuration error".to_string(),
            other => other.to_string(),
        }
    }
}
