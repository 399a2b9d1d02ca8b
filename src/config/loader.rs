//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::PermitConfig;
use super::secret::secret_string;
use crate::domain::errors::PermitError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into PermitConfig
/// 4. Applies environment variable overrides (PERMIT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsing or substitution fails,
/// or the resulting configuration is invalid.
///
/// # Examples
///
/// ```no_run
/// use permit_etl::config::loader::load_config;
///
/// let config = load_config("permit-etl.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<PermitConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(PermitError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        PermitError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: PermitConfig = toml::from_str(&contents)
        .map_err(|e| PermitError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        PermitError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Loads configuration from `path` when given, otherwise builds the defaults
///
/// Environment overrides and validation apply in both cases.
pub fn load_or_default(path: Option<&Path>) -> Result<PermitConfig> {
    match path {
        Some(path) => load_config(path),
        None => {
            let mut config = PermitConfig::default();
            apply_env_overrides(&mut config);
            config.validate().map_err(|e| {
                PermitError::Configuration(format!("Configuration validation failed: {}", e))
            })?;
            Ok(config)
        }
    }
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| PermitError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        // Comments are copied verbatim
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(PermitError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using PERMIT_* prefix
///
/// Environment variables follow the pattern: PERMIT_<SECTION>_<KEY>
/// For example: PERMIT_SOURCE_ENDPOINT, PERMIT_OUTPUT_CLEAN_DIR
fn apply_env_overrides(config: &mut PermitConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("PERMIT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Source overrides
    if let Ok(val) = std::env::var("PERMIT_SOURCE_ENDPOINT") {
        config.source.endpoint = val;
    }
    if let Ok(val) = std::env::var("PERMIT_SOURCE_PAGE_SIZE") {
        if let Ok(size) = val.parse() {
            config.source.page_size = size;
        }
    }
    if let Ok(val) = std::env::var("PERMIT_SOURCE_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.source.timeout_seconds = timeout;
        }
    }
    if let Ok(val) = std::env::var("PERMIT_SOURCE_APP_TOKEN") {
        config.source.app_token = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("PERMIT_SOURCE_RETRY_MAX_RETRIES") {
        if let Ok(retries) = val.parse() {
            config.source.retry.max_retries = retries;
        }
    }

    // Output overrides
    if let Ok(val) = std::env::var("PERMIT_OUTPUT_CLEAN_DIR") {
        config.output.clean_dir = PathBuf::from(val);
    }
    if let Ok(val) = std::env::var("PERMIT_OUTPUT_ANOMALY_DIR") {
        config.output.anomaly_dir = PathBuf::from(val);
    }
    if let Ok(val) = std::env::var("PERMIT_OUTPUT_MERGED_FILE") {
        config.output.merged_file = PathBuf::from(val);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("PERMIT_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("PERMIT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
