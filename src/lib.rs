// Permit ETL - Building-permit ingestion pipeline
// Copyright (c) 2025 Permit ETL Contributors
// Licensed under the MIT License

//! # Permit ETL
//!
//! Ingests building-permit records from a paginated open-data API, reshapes
//! each flat record into a nested schema, validates it, and persists clean and
//! rejected records separately. Clean batches are later merged into one JSON
//! array document and summarized with per-field null rates.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Mapping, validation, ingest, merge and diagnostics
//! - [`adapters`] - External integrations (Socrata open-data source)
//! - [`domain`] - Record types, anomaly entries and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use permit_etl::adapters::socrata::SocrataClient;
//! use permit_etl::config::load_or_default;
//! use permit_etl::core::diagnostics::null_report;
//! use permit_etl::core::ingest::IngestCoordinator;
//! use permit_etl::core::merge::merge_clean_batches;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_or_default(None)?;
//!     let source = Arc::new(SocrataClient::new(config.source.clone())?);
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//!     let summary = IngestCoordinator::new(&config, source, shutdown_rx).run().await?;
//!     println!("{} clean, {} anomalies", summary.total_clean, summary.total_anomalies);
//!
//!     merge_clean_batches(&config.output.clean_dir, &config.output.merged_file)?;
//!     print!("{}", null_report(&config.output.merged_file)?.render());
//!     Ok(())
//! }
//! ```
//!
//! ## Mapping and Validation
//!
//! ```rust
//! use permit_etl::core::transform::map_record;
//! use permit_etl::core::validation::validate;
//! use serde_json::json;
//!
//! let raw = json!({"permit_number": "X", "applieddate": "2023-05-01T00:00:00.000"});
//! let mapped = map_record(raw.as_object().unwrap());
//!
//! assert_eq!(mapped["dates"]["applied"], "2023-05-01");
//! assert!(validate(&mapped).is_empty());
//! ```
//!
//! ## Error Handling
//!
//! Library operations return [`domain::Result`], an alias over
//! [`domain::PermitError`]. Per-record validation failures are data, not
//! errors: they are written to the anomaly artifact.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
