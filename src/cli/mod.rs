//! CLI interface and argument parsing
//!
//! This module provides the command-line interface using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Karya - Series export tool
#[derive(Parser, Debug)]
#[command(name = "karya")]
#[command(version, about, long_about = None)]
#[command(author = "Karya Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "karya.toml", env = "KARYA_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "KARYA_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export a series of published portfolios to a PDF document
    Export(commands::export::ExportArgs),

    /// Show the preview counts for a scope without exporting
    Preview(commands::preview::PreviewArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
