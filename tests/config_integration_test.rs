//! Integration tests for configuration loading and validation
//!
//! Tests that modify environment variables hold ENV_MUTEX.

use permit_etl::config::{load_config, load_or_default};
use permit_etl::domain::PermitError;
use secrecy::ExposeSecret;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::NamedTempFile;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn cleanup_env_vars() {
    std::env::remove_var("PERMIT_APPLICATION_LOG_LEVEL");
    std::env::remove_var("PERMIT_SOURCE_ENDPOINT");
    std::env::remove_var("PERMIT_SOURCE_PAGE_SIZE");
    std::env::remove_var("PERMIT_SOURCE_APP_TOKEN");
    std::env::remove_var("PERMIT_OUTPUT_CLEAN_DIR");
    std::env::remove_var("TEST_PERMIT_TOKEN");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[application]
log_level = "warn"

[source]
endpoint = "https://data.example.gov/resource/abcd-1234.json"
page_size = 5000
timeout_seconds = 30
user_agent = "permit-etl-integration"
app_token = "literal-token"

[source.retry]
max_retries = 3
initial_delay_ms = 250
max_delay_ms = 4000
backoff_multiplier = 3.0

[output]
clean_dir = "/tmp/permits/clean"
anomaly_dir = "/tmp/permits/anomalies"
merged_file = "/tmp/permits/merged.json"

[logging]
local_enabled = true
local_path = "/tmp/permits/logs"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.application.log_level, "warn");
    assert_eq!(config.source.page_size, 5000);
    assert_eq!(config.source.timeout_seconds, 30);
    assert_eq!(config.source.user_agent, "permit-etl-integration");
    assert_eq!(
        config.source.app_token.as_ref().unwrap().expose_secret().as_ref(),
        "literal-token"
    );
    assert_eq!(config.source.retry.max_retries, 3);
    assert_eq!(config.source.retry.delay_ms(1), 250);
    assert_eq!(config.source.retry.delay_ms(2), 750);
    assert_eq!(config.source.retry.delay_ms(4), 4000);
    assert_eq!(config.output.merged_file, PathBuf::from("/tmp/permits/merged.json"));
    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_env_substitution_for_token() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_PERMIT_TOKEN", "from-env");

    let file = write_config("[source]\napp_token = \"${TEST_PERMIT_TOKEN}\"\n");
    let config = load_config(file.path()).unwrap();

    assert_eq!(
        config.source.app_token.unwrap().expose_secret().as_ref(),
        "from-env"
    );
    cleanup_env_vars();
}

#[test]
fn test_missing_substitution_variable() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("[source]\napp_token = \"${TEST_PERMIT_TOKEN}\"\n");
    match load_config(file.path()) {
        Err(PermitError::Configuration(msg)) => assert!(msg.contains("TEST_PERMIT_TOKEN")),
        other => panic!("Expected configuration error, got {other:?}"),
    }
}

#[test]
fn test_env_overrides_take_precedence() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("PERMIT_SOURCE_PAGE_SIZE", "123");
    std::env::set_var("PERMIT_OUTPUT_CLEAN_DIR", "/tmp/override");
    std::env::set_var("PERMIT_APPLICATION_LOG_LEVEL", "debug");

    let file = write_config("[source]\npage_size = 1000\n");
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.source.page_size, 123);
    assert_eq!(config.output.clean_dir, PathBuf::from("/tmp/override"));
    assert_eq!(config.application.log_level, "debug");
    cleanup_env_vars();
}

#[test]
fn test_defaults_without_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let config = load_or_default(None).unwrap();
    assert_eq!(
        config.source.endpoint,
        "https://data.austintexas.gov/resource/3syk-w9eu.json"
    );
    assert_eq!(config.source.page_size, 40_000);
    assert_eq!(config.output.clean_dir, PathBuf::from("outputs"));
    assert_eq!(config.output.anomaly_dir, PathBuf::from("logs"));
    assert!(config.source.app_token.is_none());
}

#[test]
fn test_invalid_override_fails_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("PERMIT_SOURCE_ENDPOINT", "ftp://example.com/data");

    let result = load_or_default(None);
    cleanup_env_vars();
    assert!(matches!(result, Err(PermitError::Configuration(_))));
}

#[test]
fn test_invalid_toml() {
    let file = write_config("[source\npage_size = ");
    assert!(matches!(
        load_config(file.path()),
        Err(PermitError::Configuration(_))
    ));
}

#[test]
fn test_page_size_above_limit() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("[source]\npage_size = 50001\n");
    assert!(load_config(file.path()).is_err());
}
