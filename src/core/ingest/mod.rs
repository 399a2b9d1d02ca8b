//! Batch ingest: fetch, map, validate and write
//!
//! - [`batch`] - per-batch artifact writing
//! - [`coordinator`] - the sequential fetch loop
//! - [`summary`] - run totals and reporting

pub mod batch;
pub mod coordinator;
pub mod summary;

pub use batch::{BatchResult, BatchWriter};
pub use coordinator::IngestCoordinator;
pub use summary::IngestSummary;
