//! Ingest run summary and reporting

use super::batch::BatchResult;
use chrono::{DateTime, Utc};

/// Accumulated outcome of an ingest run
#[derive(Debug, Clone)]
pub struct IngestSummary {
    /// Number of batches written
    pub batches: usize,

    /// Clean records written across all batches
    pub total_clean: u64,

    /// Anomaly entries written across all batches
    pub total_anomalies: u64,

    /// Offset of the last batch written
    pub last_offset: Option<u64>,

    /// Fetch error that ended the run early
    pub stopped_by: Option<String>,

    /// Whether a shutdown signal ended the run
    pub interrupted: bool,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl IngestSummary {
    /// Create a new summary starting now
    pub fn new() -> Self {
        Self {
            batches: 0,
            total_clean: 0,
            total_anomalies: 0,
            last_offset: None,
            stopped_by: None,
            interrupted: false,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Fold one batch result into the totals
    pub fn record_batch(&mut self, result: &BatchResult) {
        self.batches += 1;
        self.total_clean += result.clean;
        self.total_anomalies += result.anomalies;
        self.last_offset = Some(result.offset);
    }

    /// Mark the run as finished
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn total_records(&self) -> u64 {
        self.total_clean + self.total_anomalies
    }

    /// True when the source was read to its end
    pub fn is_complete(&self) -> bool {
        self.stopped_by.is_none() && !self.interrupted
    }

    /// Share of records rejected, as a percentage
    pub fn anomaly_rate(&self) -> f64 {
        let total = self.total_records();
        if total == 0 {
            return 0.0;
        }
        (self.total_anomalies as f64 / total as f64) * 100.0
    }

    /// Elapsed run time in seconds
    pub fn duration_secs(&self) -> i64 {
        let end = self.finished_at.unwrap_or_else(Utc::now);
        (end - self.started_at).num_seconds()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            batches = self.batches,
            total_records = self.total_records(),
            clean = self.total_clean,
            anomalies = self.total_anomalies,
            anomaly_rate = format!("{:.2}%", self.anomaly_rate()),
            duration_secs = self.duration_secs(),
            started_at = %self.started_at.to_rfc3339(),
            "Ingest finished"
        );

        if let Some(reason) = &self.stopped_by {
            tracing::warn!(
                last_offset = ?self.last_offset,
                reason = %reason,
                "Ingest stopped by a fetch failure; written batches were kept"
            );
        }

        if self.interrupted {
            tracing::warn!(
                last_offset = ?self.last_offset,
                "Ingest interrupted by shutdown signal"
            );
        }
    }
}

impl Default for IngestSummary {
    fn default() -> Self {
        Self::new()
    }
}
