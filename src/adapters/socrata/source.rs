//! Page source trait definition
//!
//! `PermitSource` abstracts the paginated open-data endpoint so the ingest
//! coordinator can be driven by the HTTP client in production and by an
//! in-memory source in tests.

use crate::domain::{RawRecord, Result};
use async_trait::async_trait;

/// A paginated source of flat permit records
///
/// # Example
///
/// ```no_run
/// use permit_etl::adapters::socrata::{PermitSource, SocrataClient};
/// use permit_etl::config::SourceConfig;
///
/// # async fn example() -> permit_etl::domain::Result<()> {
/// let client = SocrataClient::new(SourceConfig::default())?;
/// if let Some(page) = client.fetch_page(0, 1000).await? {
///     println!("fetched {} records", page.len());
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait PermitSource: Send + Sync {
    /// Fetch up to `limit` records starting at `offset`
    ///
    /// Returns `Ok(None)` when the page is empty, which marks the end of the
    /// stream.
    ///
    /// # Errors
    ///
    /// Returns a source error on transport failure, a non-success status, or a
    /// body that is not a JSON array of objects.
    async fn fetch_page(&self, offset: u64, limit: u64) -> Result<Option<Vec<RawRecord>>>;

    /// Endpoint description used in log fields
    fn endpoint(&self) -> &str;
}
