//! Domain models and types for the permit pipeline.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Record types** ([`RawRecord`], [`PermitRecord`] and its sections)
//! - **Anomaly entries** ([`AnomalyEntry`]) for rejected records
//! - **Error types** ([`PermitError`], [`SourceError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, PermitError>`]:
//!
//! ```rust
//! use permit_etl::domain::{PermitError, Result};
//!
//! fn example() -> Result<()> {
//!     // Errors are automatically converted using the ? operator
//!     let config = permit_etl::config::PermitConfig::default();
//!     config.validate().map_err(PermitError::Configuration)?;
//!     Ok(())
//! }
//! ```

pub mod anomaly;
pub mod errors;
pub mod record;
pub mod result;

// Re-export commonly used types for convenience
pub use anomaly::AnomalyEntry;
pub use errors::{PermitError, SourceError};
pub use record::{PermitRecord, RawRecord};
pub use result::Result;
