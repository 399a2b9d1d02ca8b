//! Init command implementation
//!
//! Writes a configuration file holding the built-in defaults.

use crate::cli::{EXIT_CONFIG, EXIT_FATAL, EXIT_SUCCESS};
use crate::config::PermitConfig;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "permit-etl.toml")]
    pub output: String,

    /// Include commented examples for every setting
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        let content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_default_config()?
        };

        match fs::write(&self.output, content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Optionally set PERMIT_APP_TOKEN in a .env file");
                println!(
                    "  3. Validate configuration: permit-etl --config {} validate-config",
                    self.output
                );
                println!("  4. Run the pipeline: permit-etl --config {} run", self.output);
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Serialize the default configuration
    fn generate_default_config() -> anyhow::Result<String> {
        let body = toml::to_string_pretty(&PermitConfig::default())?;
        Ok(format!("# Permit ETL configuration\n\n{body}"))
    }

    /// Commented template covering every setting
    fn generate_config_with_examples() -> String {
        r#"# Permit ETL configuration
# Every setting is optional; omitted values use the defaults shown here.
# ${VAR} references are replaced from the environment (and .env) on load.

[application]
# trace | debug | info | warn | error
log_level = "info"

[source]
# Socrata resource endpoint returning a JSON array per page
endpoint = "https://data.austintexas.gov/resource/3syk-w9eu.json"

# Records per request ($limit), 1..=50000
page_size = 40000

# Request timeout in seconds
timeout_seconds = 120

# Optional application token, sent as X-App-Token
# app_token = "${PERMIT_APP_TOKEN}"

[source.retry]
# 0 stops the run on the first failed page
max_retries = 0
initial_delay_ms = 1000
max_delay_ms = 30000
backoff_multiplier = 2.0

[output]
clean_dir = "outputs"
anomaly_dir = "logs"
merged_file = "outputs/austin_cleaned_merged.json"

[logging]
# JSON log files in addition to console output
local_enabled = false
local_path = "logs/app"
# daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}
