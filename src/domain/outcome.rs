//! Per-file de-identification outcome
//!
//! [`DeidOutcome`] is the record handed back across the host boundary. Exactly
//! one of `content` and `error` is populated, and which one matches `success`.
//! The fields are private so the two constructors are the only way to build one.

use serde::Serialize;

/// Result of de-identifying one source record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeidOutcome {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<Vec<u8>>,
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl DeidOutcome {
    /// Successful outcome carrying the cleaned record bytes
    pub fn success(path: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            success: true,
            content: Some(content),
            path: path.into(),
            error: None,
        }
    }

    /// Failed outcome carrying a human-readable message
    pub fn failure(path: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            content: None,
            path: path.into(),
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn content(&self) -> Option<&[u8]> {
        self.content.as_deref()
    }

    /// Caller-supplied label of the source record
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
