//! Diagnose command implementation
//!
//! Prints the per-field null report of the merged document to stdout.

use crate::cli::{EXIT_FATAL, EXIT_SUCCESS};
use crate::config::PermitConfig;
use crate::core::diagnostics::null_report;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the diagnose command
#[derive(Args, Debug, Default)]
pub struct DiagnoseArgs {
    /// Merged document to inspect (defaults to output.merged_file)
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

impl DiagnoseArgs {
    /// Execute the diagnose command
    pub fn execute(&self, config: &PermitConfig) -> anyhow::Result<i32> {
        let input = self.input.as_ref().unwrap_or(&config.output.merged_file);
        tracing::info!(input = %input.display(), "Starting diagnose command");

        match null_report(input) {
            Ok(report) => {
                print!("{}", report.render());
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                tracing::error!(error = %e, "Diagnostics failed");
                eprintln!("❌ Diagnostics failed: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_diagnose_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let args = DiagnoseArgs {
            input: Some(temp_dir.path().join("missing.json")),
        };
        assert_eq!(args.execute(&PermitConfig::default()).unwrap(), EXIT_FATAL);
    }

    #[test]
    fn test_diagnose_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("merged.json");
        std::fs::write(&input, "[\n{\"permit\":{\"number\":\"A\"}}\n]\n").unwrap();

        let args = DiagnoseArgs { input: Some(input) };
        assert_eq!(args.execute(&PermitConfig::default()).unwrap(), EXIT_SUCCESS);
    }
}
