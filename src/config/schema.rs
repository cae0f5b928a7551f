//! Configuration schema types
//!
//! This module defines the configuration structure for deidkit. Every section
//! has defaults, so an empty file (or no file at all) is a valid
//! configuration that reproduces the stock behaviour: serve on port 8000 and
//! verify `0002.DCM` into `deid_output/`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::IpAddr;
use std::path::PathBuf;

/// Main deidkit configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeidkitConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Static file server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Batch verification settings
    #[serde(default)]
    pub verify: VerifyConfig,

    /// Audit trail settings
    #[serde(default)]
    pub audit: AuditConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DeidkitConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.server.validate()?;
        self.verify.validate()?;
        self.audit.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Static file server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Directory served at `/`
    #[serde(default = "default_server_root")]
    pub root: PathBuf,

    /// Address to bind
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Port to bind; 0 picks an ephemeral port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Emit the cross-origin isolation headers required for shared memory
    /// in the browser-embedded runtime
    #[serde(default)]
    pub cross_origin_isolation: bool,

    /// Additional headers added to every response
    #[serde(default)]
    pub extra_headers: BTreeMap<String, String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            root: default_server_root(),
            bind_address: default_bind_address(),
            port: default_port(),
            cross_origin_isolation: false,
            extra_headers: BTreeMap::new(),
        }
    }
}

impl ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.root.as_os_str().is_empty() {
            return Err("server.root cannot be empty".to_string());
        }

        if self.bind_address.parse::<IpAddr>().is_err() {
            return Err(format!(
                "server.bind_address '{}' is not an IP address",
                self.bind_address
            ));
        }

        for (name, value) in &self.extra_headers {
            let valid_name = !name.is_empty()
                && name
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b));
            if !valid_name {
                return Err(format!("server.extra_headers: invalid header name '{name}'"));
            }
            if value.bytes().any(|b| b == b'\r' || b == b'\n') {
                return Err(format!(
                    "server.extra_headers: value of '{name}' contains a line break"
                ));
            }
        }

        Ok(())
    }
}

/// Batch verification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyConfig {
    /// Recipe file path, or the name of a bundled recipe
    #[serde(default = "default_recipe")]
    pub recipe: String,

    /// Input files
    #[serde(default = "default_files")]
    pub files: Vec<PathBuf>,

    /// Directory receiving the cleaned files
    #[serde(default = "default_output_folder")]
    pub output_folder: PathBuf,

    /// Replace outputs that already exist
    #[serde(default = "default_true")]
    pub overwrite: bool,

    /// Print the header of the first cleaned file
    #[serde(default)]
    pub show_header: bool,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            recipe: default_recipe(),
            files: default_files(),
            output_folder: default_output_folder(),
            overwrite: true,
            show_header: false,
        }
    }
}

impl VerifyConfig {
    fn validate(&self) -> Result<(), String> {
        if self.recipe.trim().is_empty() {
            return Err("verify.recipe cannot be empty".to_string());
        }
        if self.output_folder.as_os_str().is_empty() {
            return Err("verify.output_folder cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Audit trail configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable audit logging
    #[serde(default)]
    pub enabled: bool,

    /// Audit log file path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Use JSON lines instead of plain text
    #[serde(default = "default_true")]
    pub json_format: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
            json_format: true,
        }
    }
}

impl AuditConfig {
    fn validate(&self) -> Result<(), String> {
        if self.enabled && self.log_path.as_os_str().is_empty() {
            return Err("audit.log_path cannot be empty when audit is enabled".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write JSON logs to rolling files
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Rotation policy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.is_empty() {
            return Err("local_path cannot be empty when local logging is enabled".to_string());
        }
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_server_root() -> PathBuf {
    PathBuf::from("wasm")
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_recipe() -> String {
    "deid.dicom".to_string()
}

fn default_files() -> Vec<PathBuf> {
    vec![PathBuf::from("0002.DCM")]
}

fn default_output_folder() -> PathBuf {
    PathBuf::from("deid_output")
}

fn default_true() -> bool {
    true
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/deid.log")
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
