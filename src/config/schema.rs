//! Configuration schema types
//!
//! Every section has defaults equal to the pipeline's fixed constants, so an
//! empty TOML document (or no file at all) yields a working configuration.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default resource endpoint (City of Austin issued construction permits)
pub const DEFAULT_ENDPOINT: &str = "https://data.austintexas.gov/resource/3syk-w9eu.json";

/// Default page size for each batch
pub const DEFAULT_PAGE_SIZE: u64 = 40_000;

/// Largest page the source accepts in one request
pub const MAX_PAGE_SIZE: u64 = 50_000;

/// Main pipeline configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermitConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Remote data source settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Output artifact locations
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PermitConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.source.validate()?;
        self.output.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Retry configuration for page fetches
///
/// `max_retries = 0` keeps the stop-on-first-failure behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first request
    #[serde(default)]
    pub max_retries: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_retries > 10 {
            return Err(format!(
                "source.retry.max_retries must be <= 10, got {}",
                self.max_retries
            ));
        }

        if self.backoff_multiplier < 1.0 {
            return Err(format!(
                "source.retry.backoff_multiplier must be >= 1.0, got {}",
                self.backoff_multiplier
            ));
        }

        Ok(())
    }

    /// Delay before retry number `attempt` (1-based), capped at `max_delay_ms`
    pub fn delay_ms(&self, attempt: usize) -> u64 {
        let exponent = attempt.saturating_sub(1) as i32;
        let delay = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(exponent);
        (delay as u64).min(self.max_delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// Remote data source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Resource endpoint returning a JSON array per page
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Records requested per page (`$limit`)
    #[serde(default = "default_page_size")]
    pub page_size: u64,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Optional Socrata application token (sent as `X-App-Token`)
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_token: Option<SecretString>,

    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,
}

impl SourceConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        let url = url::Url::parse(&self.endpoint)
            .map_err(|e| format!("source.endpoint '{}' is not a valid URL: {e}", self.endpoint))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err("source.endpoint must start with http:// or https://".to_string());
        }

        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(format!(
                "source.page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            ));
        }

        if self.timeout_seconds == 0 {
            return Err("source.timeout_seconds must be > 0".to_string());
        }

        if let Some(token) = &self.app_token {
            if token.expose_secret().is_empty() {
                return Err("source.app_token cannot be empty when set".to_string());
            }
        }

        self.retry.validate()?;
        Ok(())
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            page_size: default_page_size(),
            timeout_seconds: default_timeout_seconds(),
            user_agent: default_user_agent(),
            app_token: None,
            retry: RetryConfig::default(),
        }
    }
}

/// Output artifact locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for clean batch artifacts
    #[serde(default = "default_clean_dir")]
    pub clean_dir: PathBuf,

    /// Directory for anomaly batch artifacts
    #[serde(default = "default_anomaly_dir")]
    pub anomaly_dir: PathBuf,

    /// Merged JSON array document
    #[serde(default = "default_merged_file")]
    pub merged_file: PathBuf,
}

impl OutputConfig {
    fn validate(&self) -> Result<(), String> {
        if self.clean_dir.as_os_str().is_empty() {
            return Err("output.clean_dir cannot be empty".to_string());
        }
        if self.anomaly_dir.as_os_str().is_empty() {
            return Err("output.anomaly_dir cannot be empty".to_string());
        }
        if self.merged_file.as_os_str().is_empty() {
            return Err("output.merged_file cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            clean_dir: default_clean_dir(),
            anomaly_dir: default_anomaly_dir(),
            merged_file: default_merged_file(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err(
                "logging.local_path cannot be empty when local logging is enabled".to_string(),
            );
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

fn default_timeout_seconds() -> u64 {
    120
}

fn default_user_agent() -> String {
    format!("permit-etl/{}", env!("CARGO_PKG_VERSION"))
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_clean_dir() -> PathBuf {
    PathBuf::from("outputs")
}

fn default_anomaly_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_merged_file() -> PathBuf {
    PathBuf::from("outputs/austin_cleaned_merged.json")
}

fn default_local_path() -> String {
    "logs/app".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
