//! Result type alias for deidkit
//!
//! This module provides a convenient Result type alias that uses DeidError
//! as the error type.

use super::errors::DeidError;

/// Result type alias for deidkit operations
///
/// # Examples
///
/// ```
/// use deidkit::domain::result::Result;
/// use deidkit::domain::errors::DeidError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(DeidError::Parse("not a DICOM record".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, DeidError>;
