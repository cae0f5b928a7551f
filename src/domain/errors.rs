//! Domain error types
//!
//! All errors are domain-specific and don't expose third-party types: failures
//! coming out of the DICOM crates are flattened into messages that keep their
//! full cause chain.

use thiserror::Error;

/// Main deidkit error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum DeidError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Recipe construction errors
    #[error("Recipe error: {0}")]
    Recipe(#[from] RecipeError),

    /// The input could not be read as a DICOM record
    #[error("Parse error: {0}")]
    Parse(String),

    /// A recipe action could not be applied to a record
    #[error("Action error: {0}")]
    Action(String),

    /// The transformed record could not be serialized
    #[error("Write error: {0}")]
    Write(String),

    /// Static file server errors
    #[error("Server error: {0}")]
    Server(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Recipe parsing errors
///
/// Line numbers are 1-based and refer to the recipe text as given.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecipeError {
    /// The recipe declares a format other than dicom
    #[error("Unsupported recipe format: {0}")]
    UnsupportedFormat(String),

    /// Unknown action keyword
    #[error("line {line}: unknown action '{action}'")]
    UnknownAction { line: usize, action: String },

    /// Action is missing its field or value
    #[error("line {line}: {action} requires {expected}")]
    MissingArgument {
        line: usize,
        action: String,
        expected: &'static str,
    },

    /// Field spec is neither a known keyword nor a tag
    #[error("line {line}: unknown field '{field}'")]
    UnknownField { line: usize, field: String },

    /// Value functions are not supported
    #[error("line {line}: value function '{value}' is not supported")]
    UnsupportedValue { line: usize, value: String },

    /// JITTER amount is not an integer number of days
    #[error("line {line}: invalid jitter amount '{value}'")]
    InvalidJitter { line: usize, value: String },

    /// A recipe file could not be read
    #[error("Failed to read recipe {path}: {message}")]
    Unreadable { path: String, message: String },
}

/// Renders an error together with every `source()` below it.
///
/// Used where the full diagnostic chain has to survive being turned into a
/// plain message, such as the adapter's failure result.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str("\n  caused by: ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

// Conversion from std::io::Error
impl From<std::io::Error> for DeidError {
    fn from(err: std::io::Error) -> Self {
        DeidError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for DeidError {
    fn from(err: serde_json::Error) -> Self {
        DeidError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for DeidError {
    fn from(err: toml::de::Error) -> Self {
        DeidError::Configuration(format!("TOML parse error: {err}"))
    }
}
