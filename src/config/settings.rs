use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::template::RenderOptions;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub render: RenderDefaults,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults for the rendering flags a caller does not set explicitly
#[derive(Debug, Clone, Deserialize)]
pub struct RenderDefaults {
    #[serde(default = "default_true")]
    pub show_prefix: bool,
    #[serde(default)]
    pub show_sender: bool,
    #[serde(default)]
    pub show_recipient: bool,
    #[serde(default)]
    pub redact_missing_personalisation: bool,
    #[serde(default = "default_true")]
    pub downgrade_non_sms_characters: bool,
    #[serde(default = "default_true")]
    pub complete_html: bool,
    #[serde(default = "default_true")]
    pub govuk_banner: bool,
    #[serde(default)]
    pub brand_banner: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

fn default_true() -> bool {
    true
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .set_default("render.show_prefix", true)?
            .set_default("render.downgrade_non_sms_characters", true)?
            .set_default("render.complete_html", true)?
            .set_default("render.govuk_banner", true)?
            .set_default("logging.format", "text")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // RENDER__RENDER__SHOW_PREFIX, RENDER__LOGGING__FORMAT, etc.
            .add_source(
                Environment::with_prefix("RENDER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }
}

impl Default for RenderDefaults {
    fn default() -> Self {
        Self {
            show_prefix: true,
            show_sender: false,
            show_recipient: false,
            redact_missing_personalisation: false,
            downgrade_non_sms_characters: true,
            complete_html: true,
            govuk_banner: true,
            brand_banner: false,
        }
    }
}

impl RenderDefaults {
    /// Options carrying these defaults and nothing else
    pub fn to_options(&self) -> RenderOptions {
        RenderOptions {
            show_prefix: self.show_prefix,
            show_sender: self.show_sender,
            show_recipient: self.show_recipient,
            redact_missing_personalisation: self.redact_missing_personalisation,
            downgrade_non_sms_characters: self.downgrade_non_sms_characters,
            complete_html: self.complete_html,
            govuk_banner: self.govuk_banner,
            brand_banner: self.brand_banner,
            ..RenderOptions::default()
        }
    }

    /// Overlay a caller's partial options object on these defaults
    pub fn merge(&self, overrides: &serde_json::Value) -> Result<RenderOptions, serde_json::Error> {
        let mut merged = serde_json::to_value(self.to_options())?;
        if let (Some(base), Some(overrides)) = (merged.as_object_mut(), overrides.as_object()) {
            for (key, value) in overrides {
                base.insert(key.clone(), value.clone());
            }
        }
        serde_json::from_value(merged)
    }
}
