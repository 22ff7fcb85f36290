//! CLI argument parsing for facade-finder

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the audit report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "facade-finder")]
#[command(version)]
#[command(
    about = "Find third-party embeds that could be lazy-loaded behind a facade",
    long_about = None
)]
pub struct Cli {
    /// Page-load capture (JSON: main_document_url, requests, tasks)
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Entity database (TOML); defaults to the embedded database
    #[arg(short, long, value_name = "FILE")]
    pub entities: Option<PathBuf>,

    /// Audit configuration (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug tracing to stderr
    #[arg(long)]
    pub debug: bool,
}
