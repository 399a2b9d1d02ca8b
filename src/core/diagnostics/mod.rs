//! Null-rate diagnostics over the merged document
//!
//! The merged array is read element by element through a serde sequence
//! visitor, so at most one record is held in memory. Only top-level keys are
//! inspected; nested fields are not drilled into.

use crate::domain::{PermitError, Result};
use serde::de::{self, DeserializeSeed, SeqAccess, Visitor};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Null statistics for one top-level field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldNullStats {
    /// Records in which the field was present and `null`
    pub nulls: u64,
    /// `nulls / total`, or 0 for an empty document
    pub rate: f64,
}

/// Null-rate report for a merged document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NullReport {
    /// Records in the document
    pub total: u64,
    /// Per-field statistics ordered by field name
    pub fields: BTreeMap<String, FieldNullStats>,
}

impl NullReport {
    /// Render the report as printed by the CLI
    pub fn render(&self) -> String {
        let mut out = format!("Total records: {}\n", self.total);
        for (field, stats) in &self.fields {
            out.push_str(&format!(
                "{field}: {} nulls ({:.2}%)\n",
                stats.nulls,
                stats.rate * 100.0
            ));
        }
        out
    }

    fn observe(&mut self, record: &Map<String, Value>) {
        self.total += 1;
        for (key, value) in record {
            let stats = self
                .fields
                .entry(key.clone())
                .or_insert(FieldNullStats { nulls: 0, rate: 0.0 });
            if value.is_null() {
                stats.nulls += 1;
            }
        }
    }

    fn finalize(&mut self) {
        let total = self.total;
        for stats in self.fields.values_mut() {
            stats.rate = if total == 0 {
                0.0
            } else {
                stats.nulls as f64 / total as f64
            };
        }
    }
}

/// Compute the null report for the merged document at `path`
///
/// # Errors
///
/// Returns a diagnostics error if the file cannot be opened or is not a JSON
/// array of objects.
pub fn null_report(path: &Path) -> Result<NullReport> {
    let file = File::open(path).map_err(|e| {
        PermitError::Diagnostics(format!("Failed to open {}: {e}", path.display()))
    })?;

    let report = null_report_from_reader(BufReader::new(file)).map_err(|e| match e {
        PermitError::Diagnostics(msg) => {
            PermitError::Diagnostics(format!("{}: {msg}", path.display()))
        }
        other => other,
    })?;

    tracing::info!(
        path = %path.display(),
        total = report.total,
        fields = report.fields.len(),
        "Null report computed"
    );

    Ok(report)
}

/// Compute the null report from any reader holding a JSON array of objects
///
/// # Errors
///
/// Returns a diagnostics error if the input is not a JSON array of objects.
pub fn null_report_from_reader<R: Read>(reader: R) -> Result<NullReport> {
    let mut deserializer = serde_json::Deserializer::from_reader(reader);
    let mut report = NullReport::default();

    NullCounter {
        report: &mut report,
    }
    .deserialize(&mut deserializer)
    .map_err(|e| PermitError::Diagnostics(format!("Malformed merged document: {e}")))?;

    deserializer
        .end()
        .map_err(|e| PermitError::Diagnostics(format!("Trailing data after array: {e}")))?;

    report.finalize();
    Ok(report)
}

/// Sequence visitor that folds each record into the report as it is parsed
struct NullCounter<'a> {
    report: &'a mut NullReport,
}

impl<'de> DeserializeSeed<'de> for NullCounter<'_> {
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_seq(self)
    }
}

impl<'de> Visitor<'de> for NullCounter<'_> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON array of records")
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        while let Some(record) = seq.next_element::<Map<String, Value>>()? {
            self.report.observe(&record);
        }
        Ok(())
    }
}
