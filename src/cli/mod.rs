//! CLI interface and argument parsing
//!
//! This module provides the command-line interface using clap.

pub mod commands;

use crate::config::PermitConfig;
use crate::domain::Result;
use clap::{Parser, Subcommand};

/// Run completed
pub const EXIT_SUCCESS: i32 = 0;
/// Ingest stopped by a fetch failure; written batches were kept
pub const EXIT_PARTIAL: i32 = 1;
/// Configuration could not be loaded or is invalid
pub const EXIT_CONFIG: i32 = 2;
/// Unrecoverable error
pub const EXIT_FATAL: i32 = 5;
/// Stopped by SIGINT or SIGTERM
pub const EXIT_INTERRUPTED: i32 = 130;

/// Permit ETL - building-permit ingestion pipeline
#[derive(Parser, Debug)]
#[command(name = "permit-etl")]
#[command(version, about, long_about = None)]
#[command(author = "Permit ETL Contributors")]
pub struct Cli {
    /// Path to configuration file (built-in defaults are used when omitted)
    #[arg(short, long, env = "PERMIT_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PERMIT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch all pages and write clean and anomaly batch files
    Ingest(commands::ingest::IngestArgs),

    /// Merge clean batch files into one JSON array document
    Merge(commands::merge::MergeArgs),

    /// Print per-field null rates of the merged document
    Diagnose(commands::diagnose::DiagnoseArgs),

    /// Ingest, merge and diagnose in one go
    Run(commands::run::RunArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

/// Unwrap a loaded configuration or report why it failed
///
/// Returns `None` after printing the error; callers exit with [`EXIT_CONFIG`].
pub fn require_config(loaded: Result<PermitConfig>) -> Option<PermitConfig> {
    match loaded {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            eprintln!("❌ {e}");
            None
        }
    }
}
