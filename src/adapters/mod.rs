//! External system integrations.
//!
//! - [`socrata`] - paginated open-data API source
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits so the pipeline can be
//! exercised with in-memory implementations.
//!
//! ```rust,no_run
//! use permit_etl::adapters::socrata::{PermitSource, SocrataClient};
//! use permit_etl::config::SourceConfig;
//! use std::sync::Arc;
//!
//! # fn example() -> permit_etl::domain::Result<()> {
//! let source: Arc<dyn PermitSource> = Arc::new(SocrataClient::new(SourceConfig::default())?);
//! println!("Reading from {}", source.endpoint());
//! # Ok(())
//! # }
//! ```

pub mod socrata;
