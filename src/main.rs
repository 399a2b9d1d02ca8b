// Permit ETL - Building-permit ingestion pipeline
// Copyright (c) 2025 Permit ETL Contributors
// Licensed under the MIT License

use clap::Parser;
use permit_etl::cli::{require_config, Cli, Commands, EXIT_CONFIG, EXIT_FATAL};
use permit_etl::config::{load_or_default, LoggingConfig, PermitConfig};
use permit_etl::domain::Result;
use permit_etl::log_error_with_context;
use permit_etl::logging::init_logging;
use std::path::Path;
use std::process;
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let loaded = load_or_default(cli.config.as_deref().map(Path::new));

    // Logging follows the loaded configuration; a broken config falls back to console defaults
    let (config_level, logging_config) = match &loaded {
        Ok(config) => (config.application.log_level.clone(), config.logging.clone()),
        Err(_) => ("info".to_string(), LoggingConfig::default()),
    };
    let log_level = cli.log_level.clone().unwrap_or(config_level);

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(EXIT_CONFIG);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Permit ETL - building-permit ingestion pipeline"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(sigterm) => sigterm,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install SIGTERM handler");
                    return;
                }
            };

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Received SIGINT (Ctrl+C), stopping after the current batch");
                    eprintln!("\n⚠️  Shutdown signal received, completing current batch...");
                    let _ = shutdown_tx.send(true);
                }
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, stopping after the current batch");
                    eprintln!("\n⚠️  Shutdown signal received, completing current batch...");
                    let _ = shutdown_tx.send(true);
                }
            }
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            } else {
                tracing::info!("Received SIGINT (Ctrl+C), stopping after the current batch");
                eprintln!("\n⚠️  Shutdown signal received, completing current batch...");
                let _ = shutdown_tx.send(true);
            }
        }
    });

    let exit_code = match execute_command(&cli, loaded, shutdown_rx).await {
        Ok(code) => code,
        Err(e) => {
            log_error_with_context!(&e, "Command execution failed");
            eprintln!("Error: {e}");
            EXIT_FATAL
        }
    };

    // Flush file logs before exiting
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(
    cli: &Cli,
    loaded: Result<PermitConfig>,
    shutdown_signal: watch::Receiver<bool>,
) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Init(args) => args.execute(),
        Commands::ValidateConfig(args) => args.execute(cli.config.as_deref(), loaded),
        Commands::Ingest(args) => match require_config(loaded) {
            Some(config) => args.execute(config, shutdown_signal).await,
            None => Ok(EXIT_CONFIG),
        },
        Commands::Merge(args) => match require_config(loaded) {
            Some(config) => args.execute(&config),
            None => Ok(EXIT_CONFIG),
        },
        Commands::Diagnose(args) => match require_config(loaded) {
            Some(config) => args.execute(&config),
            None => Ok(EXIT_CONFIG),
        },
        Commands::Run(args) => match require_config(loaded) {
            Some(config) => args.execute(config, shutdown_signal).await,
            None => Ok(EXIT_CONFIG),
        },
    }
}
