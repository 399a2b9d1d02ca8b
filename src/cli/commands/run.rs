//! Run command implementation
//!
//! Ingest, then merge whatever clean batches exist, then print diagnostics.
//! An interrupted ingest skips the later steps.

use super::diagnose::DiagnoseArgs;
use super::ingest::{self, IngestArgs};
use super::merge::MergeArgs;
use crate::cli::{EXIT_CONFIG, EXIT_INTERRUPTED, EXIT_SUCCESS};
use crate::config::PermitConfig;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the run command
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub ingest: IngestArgs,

    /// Skip the null-rate report
    #[arg(long)]
    pub skip_diagnostics: bool,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(
        &self,
        mut config: PermitConfig,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting full pipeline run");

        self.ingest.apply_overrides(&mut config);
        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(EXIT_CONFIG);
        }

        let summary = match ingest::ingest(&config, shutdown_signal).await {
            Ok(summary) => summary,
            Err(code) => return Ok(code),
        };
        ingest::print_summary(&summary);

        let ingest_code = ingest::exit_code(&summary);
        if ingest_code == EXIT_INTERRUPTED {
            return Ok(ingest_code);
        }

        println!();
        let merge_code = MergeArgs::default().execute(&config)?;
        if merge_code != EXIT_SUCCESS {
            return Ok(merge_code);
        }

        if !self.skip_diagnostics {
            println!();
            let diagnose_code = DiagnoseArgs::default().execute(&config)?;
            if diagnose_code != EXIT_SUCCESS {
                return Ok(diagnose_code);
            }
        }

        Ok(ingest_code)
    }
}
