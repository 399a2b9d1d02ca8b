//! Core pipeline logic.
//!
//! # Modules
//!
//! - [`transform`] - flat-to-nested field mapping
//! - [`validation`] - schema validation of mapped records
//! - [`ingest`] - batch fetch, write and coordination
//! - [`merge`] - streaming merge of clean batches
//! - [`diagnostics`] - streaming null-rate report
//!
//! # Workflow
//!
//! 1. **Fetch**: request one page at `offset`
//! 2. **Map**: reshape each flat record
//! 3. **Validate**: route each record to the clean or anomaly artifact
//! 4. **Repeat** until an empty page, a fetch failure, or shutdown
//! 5. **Merge**: concatenate clean artifacts into one JSON array
//! 6. **Diagnose**: report per-field null rates
//!
//! # Example
//!
//! ```rust,no_run
//! use permit_etl::adapters::socrata::SocrataClient;
//! use permit_etl::config::PermitConfig;
//! use permit_etl::core::ingest::IngestCoordinator;
//! use permit_etl::core::merge::merge_clean_batches;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PermitConfig::default();
//! let source = Arc::new(SocrataClient::new(config.source.clone())?);
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//! let summary = IngestCoordinator::new(&config, source, shutdown_rx).run().await?;
//! println!("Clean: {}", summary.total_clean);
//!
//! merge_clean_batches(&config.output.clean_dir, &config.output.merged_file)?;
//! # Ok(())
//! # }
//! ```

pub mod diagnostics;
pub mod ingest;
pub mod merge;
pub mod transform;
pub mod validation;
