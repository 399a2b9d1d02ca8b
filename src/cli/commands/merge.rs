//! Merge command implementation

use crate::cli::{EXIT_FATAL, EXIT_SUCCESS};
use crate::config::PermitConfig;
use crate::core::merge::merge_clean_batches;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the merge command
#[derive(Args, Debug, Default)]
pub struct MergeArgs {
    /// Directory holding clean batch files (defaults to output.clean_dir)
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Merged document path (defaults to output.merged_file)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl MergeArgs {
    /// Execute the merge command
    pub fn execute(&self, config: &PermitConfig) -> anyhow::Result<i32> {
        let input_dir = self.input_dir.as_ref().unwrap_or(&config.output.clean_dir);
        let output = self.output.as_ref().unwrap_or(&config.output.merged_file);

        tracing::info!(
            input_dir = %input_dir.display(),
            output = %output.display(),
            "Starting merge command"
        );

        match merge_clean_batches(input_dir, output) {
            Ok(report) => {
                println!(
                    "✅ Merged {} records from {} files into {}",
                    report.records,
                    report.files.len(),
                    report.output.display()
                );
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                tracing::error!(error = %e, "Merge failed");
                eprintln!("❌ Merge failed: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }
}
