//! Validate config command implementation

use crate::cli::{EXIT_CONFIG, EXIT_SUCCESS};
use crate::config::PermitConfig;
use crate::domain::Result;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// `loaded` is the result of loading `config_path` (or the defaults).
    pub fn execute(
        &self,
        config_path: Option<&str>,
        loaded: Result<PermitConfig>,
    ) -> anyhow::Result<i32> {
        let source_name = config_path.unwrap_or("<built-in defaults>");
        tracing::info!(config_path = %source_name, "Validating configuration");

        println!("🔍 Validating configuration: {source_name}");
        println!();

        let config = match loaded {
            Ok(config) => config,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Endpoint: {}", config.source.endpoint);
        println!("  Page Size: {}", config.source.page_size);
        println!("  Timeout: {}s", config.source.timeout_seconds);
        println!(
            "  App Token: {}",
            if config.source.app_token.is_some() {
                "set"
            } else {
                "not set"
            }
        );
        println!("  Max Retries: {}", config.source.retry.max_retries);
        println!("  Clean Dir: {}", config.output.clean_dir.display());
        println!("  Anomaly Dir: {}", config.output.anomaly_dir.display());
        println!("  Merged File: {}", config.output.merged_file.display());
        if config.logging.local_enabled {
            println!(
                "  File Logging: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        }

        Ok(EXIT_SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PermitError;

    #[test]
    fn test_valid_config() {
        let code = ValidateArgs {}
            .execute(None, Ok(PermitConfig::default()))
            .unwrap();
        assert_eq!(code, EXIT_SUCCESS);
    }

    #[test]
    fn test_invalid_config() {
        let code = ValidateArgs {}
            .execute(
                Some("broken.toml"),
                Err(PermitError::Configuration("bad page_size".to_string())),
            )
            .unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }
}
