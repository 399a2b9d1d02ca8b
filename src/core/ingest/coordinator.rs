//! Ingest coordinator
//!
//! Drives the fetch, transform and write loop one batch at a time, in
//! increasing offset order. The shutdown signal is checked between batches.

use super::batch::BatchWriter;
use super::summary::IngestSummary;
use crate::adapters::socrata::PermitSource;
use crate::config::PermitConfig;
use crate::domain::Result;
use crate::log_batch_complete;
use std::sync::Arc;
use tokio::sync::watch;

/// Sequential batch ingest over a [`PermitSource`]
pub struct IngestCoordinator {
    source: Arc<dyn PermitSource>,
    writer: BatchWriter,
    page_size: u64,
    shutdown_signal: watch::Receiver<bool>,
}

impl IngestCoordinator {
    /// Create a new coordinator
    ///
    /// # Arguments
    ///
    /// * `config` - Pipeline configuration (page size and output directories)
    /// * `source` - Page source to read from
    /// * `shutdown_signal` - Set to `true` to stop before the next batch
    pub fn new(
        config: &PermitConfig,
        source: Arc<dyn PermitSource>,
        shutdown_signal: watch::Receiver<bool>,
    ) -> Self {
        Self {
            source,
            writer: BatchWriter::from_config(&config.output),
            page_size: config.source.page_size,
            shutdown_signal,
        }
    }

    /// Run the ingest loop until the source is exhausted
    ///
    /// A fetch failure ends the loop and is recorded in
    /// [`IngestSummary::stopped_by`]; batches already written are kept.
    ///
    /// # Errors
    ///
    /// Returns an error only when an output directory or batch artifact
    /// cannot be written.
    pub async fn run(&self) -> Result<IngestSummary> {
        let mut summary = IngestSummary::new();
        let mut offset = 0u64;

        tracing::info!(
            endpoint = %self.source.endpoint(),
            page_size = self.page_size,
            clean_dir = %self.writer.clean_dir().display(),
            "Starting ingest"
        );
        self.writer.prepare()?;

        loop {
            if *self.shutdown_signal.borrow() {
                tracing::warn!(offset = offset, "Shutdown requested, stopping before next batch");
                summary.interrupted = true;
                break;
            }

            let page = match self.source.fetch_page(offset, self.page_size).await {
                Ok(Some(page)) => page,
                Ok(None) => {
                    tracing::info!(offset = offset, "No more records");
                    break;
                }
                Err(e) => {
                    tracing::error!(offset = offset, error = %e, "Failed to fetch page");
                    summary.stopped_by = Some(e.to_string());
                    break;
                }
            };

            tracing::debug!(offset = offset, fetched = page.len(), "Fetched page");

            let result = self.writer.write_batch(offset, &page)?;
            log_batch_complete!(offset, result.clean, result.anomalies);
            summary.record_batch(&result);

            offset += self.page_size;
        }

        summary.finish();
        summary.log_summary();

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PermitError, RawRecord, SourceError};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serves scripted pages in order and records requested offsets
    struct ScriptedSource {
        pages: Mutex<VecDeque<Result<Option<Vec<RawRecord>>>>>,
        requests: Mutex<Vec<(u64, u64)>>,
    }

    impl ScriptedSource {
        fn new(pages: Vec<Result<Option<Vec<RawRecord>>>>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<(u64, u64)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PermitSource for ScriptedSource {
        async fn fetch_page(&self, offset: u64, limit: u64) -> Result<Option<Vec<RawRecord>>> {
            self.requests.lock().unwrap().push((offset, limit));
            self.pages.lock().unwrap().pop_front().unwrap_or(Ok(None))
        }

        fn endpoint(&self) -> &str {
            "scripted"
        }
    }

    fn page(numbers: &[&str]) -> Vec<RawRecord> {
        numbers
            .iter()
            .map(|n| json!({ "permit_number": n }).as_object().cloned().unwrap())
            .collect()
    }

    fn config_in(dir: &TempDir, page_size: u64) -> PermitConfig {
        let mut config = PermitConfig::default();
        config.source.page_size = page_size;
        config.output.clean_dir = dir.path().join("outputs");
        config.output.anomaly_dir = dir.path().join("logs");
        config
    }

    #[tokio::test]
    async fn test_run_until_empty_page() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir, 2);
        let source = Arc::new(ScriptedSource::new(vec![
            Ok(Some(page(&["A", "B"]))),
            Ok(Some(page(&["C"]))),
            Ok(None),
        ]));
        let (_tx, rx) = watch::channel(false);

        let coordinator = IngestCoordinator::new(&config, source.clone(), rx);
        let summary = coordinator.run().await.unwrap();

        assert_eq!(summary.batches, 2);
        assert_eq!(summary.total_clean, 3);
        assert!(summary.is_complete());
        assert_eq!(source.requests(), vec![(0, 2), (2, 2), (4, 2)]);

        let writer = BatchWriter::from_config(&config.output);
        assert!(writer.clean_path(0).exists());
        assert!(writer.clean_path(2).exists());
        assert!(!writer.clean_path(4).exists());
        assert!(!writer.anomaly_path(4).exists());
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_earlier_batches() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir, 40_000);
        let source = Arc::new(ScriptedSource::new(vec![
            Ok(Some(page(&["A"]))),
            Err(PermitError::Source(SourceError::HttpStatus {
                status: 500,
                body: "boom".to_string(),
            })),
        ]));
        let (_tx, rx) = watch::channel(false);

        let summary = IngestCoordinator::new(&config, source, rx)
            .run()
            .await
            .unwrap();

        assert_eq!(summary.batches, 1);
        assert_eq!(summary.stopped_by.as_deref(), Some("Source error: HTTP 500: boom"));
        assert!(!summary.is_complete());

        let writer = BatchWriter::from_config(&config.output);
        assert!(writer.clean_path(0).exists());
        assert!(!writer.clean_path(40_000).exists());
    }

    #[tokio::test]
    async fn test_shutdown_before_first_batch() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir, 10);
        let source = Arc::new(ScriptedSource::new(vec![Ok(Some(page(&["A"])))]));
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();

        let summary = IngestCoordinator::new(&config, source.clone(), rx)
            .run()
            .await
            .unwrap();

        assert!(summary.interrupted);
        assert_eq!(summary.batches, 0);
        assert!(source.requests().is_empty());
        assert_eq!(fs::read_dir(&config.output.clean_dir).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_first_page_empty_leaves_empty_output_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir, 10);
        let source = Arc::new(ScriptedSource::new(vec![Ok(None)]));
        let (_tx, rx) = watch::channel(false);

        let summary = IngestCoordinator::new(&config, source, rx)
            .run()
            .await
            .unwrap();

        assert_eq!(summary.batches, 0);
        assert!(summary.is_complete());
        assert_eq!(fs::read_dir(&config.output.clean_dir).unwrap().count(), 0);
        assert_eq!(fs::read_dir(&config.output.anomaly_dir).unwrap().count(), 0);
    }
}
