use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use serde::Deserialize;

use notify_template_core::config::Settings;
use notify_template_core::telemetry::init_tracing;
use notify_template_core::{AppError, Result};
use notify_template_core::template::{AnyTemplate, Personalisation, TemplateKind, TemplateSpec};

/// Render a message template for one channel
#[derive(Debug, Parser)]
#[command(name = "template-render", version, about)]
struct Cli {
    /// Variant to render, e.g. `sms-message`, `html-email` or `HTMLEmailTemplate`
    #[arg(long, env = "RENDER_VARIANT")]
    variant: String,

    /// JSON request file, `-` for stdin
    #[arg(long, default_value = "-")]
    input: PathBuf,

    /// Print a JSON summary with counts instead of the rendered text
    #[arg(long)]
    summary: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RenderRequest {
    template: serde_json::Value,
    #[serde(default)]
    personalisation: Personalisation,
    #[serde(default)]
    options: serde_json::Value,
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn run(cli: &Cli) -> Result<()> {
    // Load configuration
    let settings = Settings::new()?;
    init_tracing(&settings.logging)?;
    tracing::debug!("Configuration loaded");

    let kind = TemplateKind::from_name(&cli.variant)?;
    let request: RenderRequest = serde_json::from_str(&read_input(&cli.input)?)?;

    let spec = TemplateSpec::from_json(&request.template)?;
    let options = settings.render.merge(&request.options)?;
    let template = AnyTemplate::build(kind, spec, options, request.personalisation)?;

    tracing::info!(
        variant = %kind,
        placeholders = template.as_template().placeholders().len(),
        "Rendering template"
    );

    if cli.summary {
        println!("{}", serde_json::to_string_pretty(&template.summary())?);
    } else {
        println!("{}", template);
    }

    Ok(())
}

fn report(err: &AppError) {
    tracing::error!(code = err.code(), error = %err, "Render failed");
    eprintln!("{}: {}", err.code(), err.client_message());
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}
