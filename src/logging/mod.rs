//! Logging and observability
//!
//! Structured logging with:
//! - Human-readable console output on stderr
//! - Configurable log levels, overridable through `RUST_LOG`
//! - Optional JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use deidkit::logging::init_logging;
//! use deidkit::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the outcome of a batch verification run
///
/// # Example
///
/// ```no_run
/// use deidkit::log_verify_complete;
/// use std::time::Duration;
///
/// log_verify_complete!(3, 2, Duration::from_millis(120));
/// ```
#[macro_export]
macro_rules! log_verify_complete {
    ($requested:expr, $produced:expr, $duration:expr) => {
        tracing::info!(
            requested = $requested,
            produced = $produced,
            duration_ms = $duration.as_millis() as u64,
            "Verification completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use deidkit::log_error_with_context;
/// use deidkit::domain::DeidError;
///
/// let error = DeidError::Configuration("Invalid config".to_string());
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
