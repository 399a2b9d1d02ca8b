//! Configuration management.
//!
//! TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Configuration files support:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Default values for every setting (an empty file is valid)
//! - `PERMIT_<SECTION>_<KEY>` environment overrides
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use permit_etl::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("permit-etl.toml")?;
//!
//! println!("Endpoint: {}", config.source.endpoint);
//! println!("Page size: {}", config.source.page_size);
//! println!("Clean batches: {}", config.output.clean_dir.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [source]
//! endpoint = "https://data.austintexas.gov/resource/3syk-w9eu.json"
//! page_size = 40000
//! app_token = "${PERMIT_APP_TOKEN}"
//!
//! [source.retry]
//! max_retries = 0
//!
//! [output]
//! clean_dir = "outputs"
//! anomaly_dir = "logs"
//! merged_file = "outputs/austin_cleaned_merged.json"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_or_default};
pub use schema::{
    ApplicationConfig, LoggingConfig, OutputConfig, PermitConfig, RetryConfig, SourceConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
