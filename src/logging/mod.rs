//! Logging and observability
//!
//! Structured logging via `tracing`:
//! - Console output with configurable level
//! - Optional JSON file logging with rotation
//! - Helper macros for the recurring pipeline events
//!
//! # Example
//!
//! ```no_run
//! use permit_etl::logging::init_logging;
//! use permit_etl::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log the completion of one written batch
///
/// # Example
///
/// ```no_run
/// use permit_etl::log_batch_complete;
///
/// log_batch_complete!(40000, 39998, 2);
/// ```
#[macro_export]
macro_rules! log_batch_complete {
    ($offset:expr, $clean:expr, $anomalies:expr) => {
        tracing::info!(
            offset = $offset,
            clean = $clean,
            anomalies = $anomalies,
            "Batch written"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use permit_etl::log_error_with_context;
/// use permit_etl::domain::PermitError;
///
/// let error = PermitError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use permit_etl::log_retry_attempt;
///
/// log_retry_attempt!(2, 3, "Connection timeout");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, %$reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            reason = %$reason,
            "Retrying request"
        );
    };
    ($attempt:expr, $max_attempts:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            reason = $reason,
            "Retrying request"
        );
    };
}
