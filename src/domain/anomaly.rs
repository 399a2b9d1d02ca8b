//! Rejected-record entries written to anomaly artifacts

use super::errors::PermitError;
use super::result::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A record that failed validation, with the reasons it was rejected
///
/// `row` is the global ordinal of the record in the source (`offset + index`).
/// `data` carries the mapped record exactly as it was validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyEntry {
    pub row: u64,
    pub errors: Vec<String>,
    pub data: Value,
}

impl AnomalyEntry {
    /// Create an anomaly entry
    ///
    /// # Errors
    ///
    /// Returns a validation error if `errors` is empty; an anomaly always has a reason.
    pub fn new(row: u64, errors: Vec<String>, data: Value) -> Result<Self> {
        if errors.is_empty() {
            return Err(PermitError::Validation(format!(
                "Anomaly entry for row {row} has no errors"
            )));
        }
        Ok(Self { row, errors, data })
    }
}
