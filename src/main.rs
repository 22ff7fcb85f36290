use anyhow::{Context, Result};
use clap::Parser;
use facade_finder::audit::FacadeAudit;
use facade_finder::classifier::EntityRegistry;
use facade_finder::cli::{Cli, OutputFormat};
use facade_finder::config::AuditConfig;
use facade_finder::json_output::JsonReport;
use facade_finder::summary::PageCapture;
use facade_finder::text_output;
use std::fs;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_capture(args: &Cli) -> Result<PageCapture> {
    let content = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read capture: {}", args.input.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse capture: {}", args.input.display()))
}

fn load_registry(args: &Cli) -> Result<EntityRegistry> {
    match &args.entities {
        Some(path) => EntityRegistry::from_toml(path)
            .with_context(|| format!("Failed to load entity database: {}", path.display())),
        None => EntityRegistry::default_database().context("Failed to load embedded entity database"),
    }
}

fn load_config(args: &Cli) -> Result<AuditConfig> {
    match &args.config {
        Some(path) => AuditConfig::from_toml(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(AuditConfig::default()),
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let capture = load_capture(&args)?;
    let registry = load_registry(&args)?;
    let config = load_config(&args)?;

    let audit = FacadeAudit::new(&registry, config);
    let result = audit.run_capture(&capture);

    match args.format {
        OutputFormat::Text => {
            print!(
                "{}",
                text_output::render(&capture.main_document_url, &result, audit.config())
            );
        }
        OutputFormat::Json => {
            let report = JsonReport::new(&capture.main_document_url, &result, audit.config());
            println!("{}", report.to_json().context("Failed to serialize report")?);
        }
    }

    Ok(())
}
