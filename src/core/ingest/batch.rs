//! Per-batch transformation and artifact writing
//!
//! Each batch produces exactly two line-delimited files named by the batch's
//! zero-padded offset: one of clean records and one of anomaly entries.

use crate::config::OutputConfig;
use crate::core::transform::map_record;
use crate::core::validation::validate_record;
use crate::domain::{AnomalyEntry, PermitError, RawRecord, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Glob pattern matching clean batch artifacts
pub const CLEAN_BATCH_PATTERN: &str = "clean_batch_*.jsonl";

/// File name of the clean artifact for the batch at `offset`
pub fn clean_file_name(offset: u64) -> String {
    format!("clean_batch_{offset:012}.jsonl")
}

/// File name of the anomaly artifact for the batch at `offset`
pub fn anomaly_file_name(offset: u64) -> String {
    format!("anomalies_batch_{offset:012}.jsonl")
}

/// Result of processing a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchResult {
    /// Offset of the first record in the batch
    pub offset: u64,
    /// Records that passed validation
    pub clean: u64,
    /// Records routed to the anomaly artifact
    pub anomalies: u64,
}

impl BatchResult {
    /// Create an empty result for the batch at `offset`
    pub fn new(offset: u64) -> Self {
        Self {
            offset,
            clean: 0,
            anomalies: 0,
        }
    }

    /// Records processed in the batch
    pub fn total(&self) -> u64 {
        self.clean + self.anomalies
    }
}

/// Writes clean and anomaly artifacts for a batch
#[derive(Debug, Clone)]
pub struct BatchWriter {
    clean_dir: PathBuf,
    anomaly_dir: PathBuf,
}

impl BatchWriter {
    /// Create a writer for the given directories
    pub fn new(clean_dir: impl Into<PathBuf>, anomaly_dir: impl Into<PathBuf>) -> Self {
        Self {
            clean_dir: clean_dir.into(),
            anomaly_dir: anomaly_dir.into(),
        }
    }

    /// Create a writer from the output configuration
    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.clean_dir, &config.anomaly_dir)
    }

    pub fn clean_dir(&self) -> &Path {
        &self.clean_dir
    }

    /// Create the clean and anomaly directories
    ///
    /// # Errors
    ///
    /// Returns an I/O error if either directory cannot be created.
    pub fn prepare(&self) -> Result<()> {
        create_dir(&self.clean_dir)?;
        create_dir(&self.anomaly_dir)
    }

    pub fn clean_path(&self, offset: u64) -> PathBuf {
        self.clean_dir.join(clean_file_name(offset))
    }

    pub fn anomaly_path(&self, offset: u64) -> PathBuf {
        self.anomaly_dir.join(anomaly_file_name(offset))
    }

    /// Map, validate and persist one batch
    ///
    /// Record `i` is row `offset + i`. Source order is preserved in both
    /// artifacts. Both files are created even when one of them stays empty.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if a directory or file cannot be created or written.
    pub fn write_batch(&self, offset: u64, records: &[RawRecord]) -> Result<BatchResult> {
        self.prepare()?;

        let clean_path = self.clean_path(offset);
        let anomaly_path = self.anomaly_path(offset);
        let mut clean = LineWriter::create(&clean_path)?;
        let mut anomalies = LineWriter::create(&anomaly_path)?;
        let mut result = BatchResult::new(offset);

        for (index, raw) in records.iter().enumerate() {
            let row = offset + index as u64;
            let mapped = map_record(raw);

            match validate_record(&mapped) {
                Ok(record) => {
                    clean.write_line(&record)?;
                    result.clean += 1;
                }
                Err(errors) => {
                    tracing::debug!(row = row, errors = ?errors, "Record rejected");
                    let entry = AnomalyEntry::new(row, errors, mapped)?;
                    anomalies.write_line(&entry)?;
                    result.anomalies += 1;
                }
            }
        }

        clean.finish()?;
        anomalies.finish()?;

        Ok(result)
    }
}

fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| {
        PermitError::Io(format!("Failed to create directory {}: {e}", dir.display()))
    })
}

/// Buffered JSON-lines file that reports its path on failure
struct LineWriter {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl LineWriter {
    fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .map_err(|e| PermitError::Io(format!("Failed to create {}: {e}", path.display())))?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    fn write_line<T: Serialize>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer(&mut self.writer, value).map_err(|e| {
            PermitError::Io(format!("Failed to write {}: {e}", self.path.display()))
        })?;
        self.writer
            .write_all(b"\n")
            .map_err(|e| PermitError::Io(format!("Failed to write {}: {e}", self.path.display())))
    }

    fn finish(mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| PermitError::Io(format!("Failed to flush {}: {e}", self.path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn raw(value: Value) -> RawRecord {
        value.as_object().cloned().unwrap()
    }

    fn read_lines(path: &Path) -> Vec<Value> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_file_names_are_zero_padded() {
        assert_eq!(clean_file_name(0), "clean_batch_000000000000.jsonl");
        assert_eq!(clean_file_name(40_000), "clean_batch_000000040000.jsonl");
        assert_eq!(
            anomaly_file_name(80_000),
            "anomalies_batch_000000080000.jsonl"
        );
    }

    #[test]
    fn test_file_names_sort_by_offset() {
        let mut names = vec![clean_file_name(120_000), clean_file_name(40_000)];
        names.sort();
        assert_eq!(names[0], clean_file_name(40_000));
    }

    #[test]
    fn test_write_batch_splits_clean_and_anomalies() {
        let temp_dir = TempDir::new().unwrap();
        let writer = BatchWriter::new(
            temp_dir.path().join("outputs"),
            temp_dir.path().join("logs"),
        );

        let records = vec![
            raw(json!({"permit_number": "2023-001", "latitude": "30.26"})),
            raw(json!({"latitude": "30.26"})),
            raw(json!({"permit_number": "2023-003"})),
        ];

        let result = writer.write_batch(40_000, &records).unwrap();
        assert_eq!(result.clean, 2);
        assert_eq!(result.anomalies, 1);
        assert_eq!(result.total(), 3);

        let clean = read_lines(&writer.clean_path(40_000));
        assert_eq!(clean.len(), 2);
        assert_eq!(clean[0]["permit"]["number"], "2023-001");
        assert_eq!(clean[0]["coordinates"]["latitude"], json!(30.26));
        assert_eq!(clean[1]["permit"]["number"], "2023-003");

        let anomalies = read_lines(&writer.anomaly_path(40_000));
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0]["row"], 40_001);
        assert_eq!(anomalies[0]["errors"], json!(["Missing permit_id"]));
        assert_eq!(anomalies[0]["data"]["permit"]["number"], Value::Null);
    }

    #[test]
    fn test_write_batch_creates_empty_anomaly_file() {
        let temp_dir = TempDir::new().unwrap();
        let writer = BatchWriter::new(temp_dir.path(), temp_dir.path());

        let result = writer
            .write_batch(0, &[raw(json!({"permit_number": "A"}))])
            .unwrap();

        assert_eq!(result.anomalies, 0);
        assert!(writer.anomaly_path(0).exists());
        assert_eq!(fs::read_to_string(writer.anomaly_path(0)).unwrap(), "");
    }

    #[test]
    fn test_write_batch_fails_when_directory_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let writer = BatchWriter::new(blocker.join("clean"), temp_dir.path());
        let result = writer.write_batch(0, &[raw(json!({"permit_number": "A"}))]);
        assert!(matches!(result, Err(PermitError::Io(_))));
    }
}
