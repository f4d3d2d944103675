mod settings;

pub use settings::{LogFormat, LoggingConfig, RenderDefaults, Settings};
