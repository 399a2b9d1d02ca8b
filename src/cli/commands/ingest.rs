//! Ingest command implementation
//!
//! Pages through the source and writes clean and anomaly batch files.

use crate::adapters::socrata::SocrataClient;
use crate::cli::{EXIT_CONFIG, EXIT_FATAL, EXIT_INTERRUPTED, EXIT_PARTIAL, EXIT_SUCCESS};
use crate::config::PermitConfig;
use crate::core::ingest::{IngestCoordinator, IngestSummary};
use clap::Args;
use std::sync::Arc;
use tokio::sync::watch;

/// Arguments for the ingest command
#[derive(Args, Debug, Default)]
pub struct IngestArgs {
    /// Override the resource endpoint
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Override records per page
    #[arg(long)]
    pub page_size: Option<u64>,

    /// Override retry attempts per page (0 disables retry)
    #[arg(long)]
    pub max_retries: Option<usize>,
}

impl IngestArgs {
    /// Apply CLI overrides to the configuration
    pub fn apply_overrides(&self, config: &mut PermitConfig) {
        if let Some(endpoint) = &self.endpoint {
            tracing::info!(endpoint = %endpoint, "Overriding endpoint from CLI");
            config.source.endpoint = endpoint.clone();
        }
        if let Some(page_size) = self.page_size {
            tracing::info!(page_size = page_size, "Overriding page size from CLI");
            config.source.page_size = page_size;
        }
        if let Some(max_retries) = self.max_retries {
            tracing::info!(max_retries = max_retries, "Overriding retries from CLI");
            config.source.retry.max_retries = max_retries;
        }
    }

    /// Execute the ingest command
    pub async fn execute(
        &self,
        mut config: PermitConfig,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting ingest command");

        self.apply_overrides(&mut config);
        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(EXIT_CONFIG);
        }

        let summary = match ingest(&config, shutdown_signal).await {
            Ok(summary) => summary,
            Err(code) => return Ok(code),
        };

        print_summary(&summary);
        Ok(exit_code(&summary))
    }
}

/// Build the source and run the coordinator, mapping failures to exit codes
pub(crate) async fn ingest(
    config: &PermitConfig,
    shutdown_signal: watch::Receiver<bool>,
) -> Result<IngestSummary, i32> {
    let source = match SocrataClient::new(config.source.clone()) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::error!(error = %e, "Failed to create source client");
            eprintln!("Failed to initialize source: {e}");
            return Err(EXIT_CONFIG);
        }
    };

    println!("🚀 Ingesting from {}", config.source.endpoint);

    IngestCoordinator::new(config, source, shutdown_signal)
        .run()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Ingest failed");
            eprintln!("Ingest failed: {e}");
            EXIT_FATAL
        })
}

/// Exit code for a finished ingest
pub(crate) fn exit_code(summary: &IngestSummary) -> i32 {
    if summary.interrupted {
        EXIT_INTERRUPTED
    } else if summary.stopped_by.is_some() {
        EXIT_PARTIAL
    } else {
        EXIT_SUCCESS
    }
}

pub(crate) fn print_summary(summary: &IngestSummary) {
    println!();
    println!("📊 Ingest Summary:");
    println!("  Batches: {}", summary.batches);
    println!("  Records: {}", summary.total_records());
    println!("  Clean: {}", summary.total_clean);
    println!("  Anomalies: {}", summary.total_anomalies);
    println!("  Anomaly Rate: {:.2}%", summary.anomaly_rate());
    println!("  Duration: {}s", summary.duration_secs());
    println!();

    if let Some(reason) = &summary.stopped_by {
        println!("⚠️  Ingest stopped early: {reason}");
        println!("   Batches written before the failure were kept.");
    } else if summary.interrupted {
        println!("⚠️  Ingest interrupted. Batches written so far were kept.");
    } else {
        println!("✅ Ingest completed successfully!");
    }
}
