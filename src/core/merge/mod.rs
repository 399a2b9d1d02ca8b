//! Merge of clean batch artifacts into one JSON array document
//!
//! Inputs are streamed line by line; each non-blank line is checked to be a
//! well-formed JSON document and copied verbatim as one array element. The
//! output is written to a sibling temporary file and renamed into place, so a
//! failed merge never leaves a truncated document behind.

use crate::core::ingest::batch::CLEAN_BATCH_PATTERN;
use crate::domain::{PermitError, Result};
use serde::de::IgnoredAny;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Outcome of a merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// Input files merged, in order
    pub files: Vec<PathBuf>,
    /// Array elements written
    pub records: u64,
    /// Blank lines skipped
    pub blank_lines: u64,
    /// Output document
    pub output: PathBuf,
}

/// Discover clean batch artifacts in `dir`, sorted by file name
///
/// # Errors
///
/// Returns a merge error if the directory does not exist or cannot be read.
pub fn discover_clean_batches(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(PermitError::Merge(format!(
            "Clean batch directory not found: {}",
            dir.display()
        )));
    }

    // Metacharacters in the directory name must match literally
    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    let pattern = Path::new(&escaped).join(CLEAN_BATCH_PATTERN);
    let pattern = pattern.to_string_lossy();

    let entries = glob::glob(&pattern)
        .map_err(|e| PermitError::Merge(format!("Invalid batch pattern {pattern}: {e}")))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| {
            PermitError::Merge(format!("Failed to read {}: {e}", e.path().display()))
        })?;
        files.push(path);
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Merge all clean batch artifacts in `dir` into `output`
///
/// # Errors
///
/// See [`merge_files`].
pub fn merge_clean_batches(dir: &Path, output: &Path) -> Result<MergeReport> {
    let files = discover_clean_batches(dir)?;
    tracing::info!(
        dir = %dir.display(),
        files = files.len(),
        "Discovered clean batches"
    );
    merge_files(&files, output)
}

/// Merge `inputs`, in the order given, into a JSON array at `output`
///
/// The document is `[` newline, elements separated by `,` newline, then
/// newline `]` newline. With no elements the document is `[\n\n]\n`.
///
/// # Errors
///
/// Returns a merge error naming the file (and line) if an input cannot be
/// read or holds a malformed line, or if the output cannot be written.
pub fn merge_files(inputs: &[PathBuf], output: &Path) -> Result<MergeReport> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            PermitError::Merge(format!("Failed to create {}: {e}", parent.display()))
        })?;
    }

    let temp_path = temp_path_for(output);
    let result = write_merged(inputs, output, &temp_path);

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    let report = result?;
    fs::rename(&temp_path, output).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        PermitError::Merge(format!("Failed to move merged file into {}: {e}", output.display()))
    })?;

    tracing::info!(
        output = %output.display(),
        files = report.files.len(),
        records = report.records,
        "Merge complete"
    );

    Ok(report)
}

fn write_merged(inputs: &[PathBuf], output: &Path, temp_path: &Path) -> Result<MergeReport> {
    let out_err = |e: std::io::Error| {
        PermitError::Merge(format!("Failed to write {}: {e}", temp_path.display()))
    };

    let file = File::create(temp_path).map_err(out_err)?;
    let mut writer = BufWriter::new(file);
    let mut report = MergeReport {
        files: Vec::with_capacity(inputs.len()),
        records: 0,
        blank_lines: 0,
        output: output.to_path_buf(),
    };

    writer.write_all(b"[\n").map_err(out_err)?;

    for input in inputs {
        let file = File::open(input)
            .map_err(|e| PermitError::Merge(format!("Failed to open {}: {e}", input.display())))?;

        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line_no = index + 1;
            let line = line.map_err(|e| {
                PermitError::Merge(format!(
                    "Failed to read {} line {line_no}: {e}",
                    input.display()
                ))
            })?;

            let element = line.trim();
            if element.is_empty() {
                report.blank_lines += 1;
                continue;
            }

            serde_json::from_str::<IgnoredAny>(element).map_err(|e| {
                PermitError::Merge(format!(
                    "Malformed JSON in {} line {line_no}: {e}",
                    input.display()
                ))
            })?;

            if report.records > 0 {
                writer.write_all(b",\n").map_err(out_err)?;
            }
            writer.write_all(element.as_bytes()).map_err(out_err)?;
            report.records += 1;
        }

        tracing::debug!(file = %input.display(), "Merged batch file");
        report.files.push(input.clone());
    }

    writer.write_all(b"\n]\n").map_err(out_err)?;
    writer.flush().map_err(out_err)?;

    Ok(report)
}

fn temp_path_for(output: &Path) -> PathBuf {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "merged.json".to_string());
    output.with_file_name(format!(".{name}.tmp"))
}
