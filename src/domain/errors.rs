//! Domain error types
//!
//! This module defines the error hierarchy for the permit pipeline.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main pipeline error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum PermitError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Remote data source errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Merge errors (unreadable batch file, malformed line)
    #[error("Merge error: {0}")]
    Merge(String),

    /// Diagnostics errors (unreadable or malformed merged document)
    #[error("Diagnostics error: {0}")]
    Diagnostics(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Remote data source errors
///
/// Errors that occur while paging through the open-data API.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to reach the server
    #[error("Failed to connect to data source: {0}")]
    ConnectionFailed(String),

    /// Non-success HTTP status
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Body was not a JSON array of objects
    #[error("Invalid response from data source: {0}")]
    InvalidResponse(String),

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

impl SourceError {
    /// Whether a bounded retry may help
    ///
    /// Transport failures, timeouts, 429 and 5xx are retryable. Everything else
    /// (4xx, malformed bodies) fails the same way on every attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            SourceError::ConnectionFailed(_) | SourceError::Timeout(_) => true,
            SourceError::HttpStatus { status, .. } => {
                *status == 429 || (500..600).contains(status)
            }
            SourceError::InvalidResponse(_) => false,
        }
    }
}
