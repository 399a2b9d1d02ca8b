//! Result type alias for the permit pipeline

use super::errors::PermitError;

/// Result type alias for pipeline operations
///
/// # Examples
///
/// ```
/// use permit_etl::domain::result::Result;
/// use permit_etl::domain::errors::PermitError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(PermitError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, PermitError>;
