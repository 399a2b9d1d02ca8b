//! Integration tests for graceful shutdown
//!
//! These tests verify that:
//! - Shutdown signals propagate through the watch channel
//! - A signal raised mid-run stops the loop before the next batch
//! - Batches written before the signal stay intact

use async_trait::async_trait;
use permit_etl::adapters::socrata::PermitSource;
use permit_etl::config::PermitConfig;
use permit_etl::core::ingest::{BatchWriter, IngestCoordinator};
use permit_etl::domain::{RawRecord, Result};
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::watch;

/// Endless source that raises the shutdown signal after serving `trip_after` pages
struct TrippingSource {
    served: AtomicU64,
    trip_after: u64,
    shutdown_tx: watch::Sender<bool>,
}

#[async_trait]
impl PermitSource for TrippingSource {
    async fn fetch_page(&self, offset: u64, _limit: u64) -> Result<Option<Vec<RawRecord>>> {
        let served = self.served.fetch_add(1, Ordering::SeqCst) + 1;
        if served >= self.trip_after {
            let _ = self.shutdown_tx.send(true);
        }
        let record = json!({ "permit_number": format!("P-{offset}") });
        Ok(Some(vec![record.as_object().cloned().unwrap()]))
    }

    fn endpoint(&self) -> &str {
        "tripping"
    }
}

#[tokio::test]
async fn test_shutdown_signal_propagation() {
    let (shutdown_tx, shutdown_rx1) = watch::channel(false);
    let shutdown_rx2 = shutdown_rx1.clone();

    assert!(!*shutdown_rx1.borrow());
    assert!(!*shutdown_rx2.borrow());

    shutdown_tx.send(true).unwrap();

    assert!(*shutdown_rx1.borrow());
    assert!(*shutdown_rx2.borrow());
}

#[tokio::test]
async fn test_signal_mid_run_finishes_current_batch() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = PermitConfig::default();
    config.source.page_size = 1;
    config.output.clean_dir = temp_dir.path().join("outputs");
    config.output.anomaly_dir = temp_dir.path().join("logs");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let source = Arc::new(TrippingSource {
        served: AtomicU64::new(0),
        trip_after: 3,
        shutdown_tx,
    });

    let summary = IngestCoordinator::new(&config, source, shutdown_rx)
        .run()
        .await
        .unwrap();

    assert!(summary.interrupted);
    assert!(summary.stopped_by.is_none());
    assert_eq!(summary.batches, 3);
    assert_eq!(summary.last_offset, Some(2));

    let writer = BatchWriter::from_config(&config.output);
    for offset in 0..3 {
        let clean = std::fs::read_to_string(writer.clean_path(offset)).unwrap();
        assert_eq!(clean.lines().count(), 1);
        assert!(writer.anomaly_path(offset).exists());
    }
    assert!(!writer.clean_path(3).exists());
}
