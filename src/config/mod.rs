//! Configuration management for deidkit.
//!
//! deidkit reads an optional TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Default values for every setting
//! - `DEIDKIT_*` environment overrides
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [server]
//! root = "wasm"
//! port = 8000
//! cross_origin_isolation = true
//!
//! [verify]
//! recipe = "deid.dicom"
//! files = ["0002.DCM"]
//! output_folder = "deid_output"
//! overwrite = true
//!
//! [audit]
//! enabled = true
//! log_path = "./audit/deid.log"
//! ```
//!
//! # Loading
//!
//! ```rust,no_run
//! use deidkit::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("deidkit.toml")?;
//! println!("Serving {} on port {}", config.server.root.display(), config.server.port);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default, DEFAULT_CONFIG_PATH};
pub use schema::{
    ApplicationConfig, AuditConfig, DeidkitConfig, LoggingConfig, ServerConfig, VerifyConfig,
};
