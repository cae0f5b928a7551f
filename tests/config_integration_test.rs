//! Integration tests for configuration loading and validation
//!
//! Tests that touch `DEIDKIT_*` variables hold `ENV_MUTEX` so they do not
//! observe each other's overrides.

use deidkit::config::{load_config, load_config_or_default};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("DEIDKIT_APPLICATION_LOG_LEVEL");
    std::env::remove_var("DEIDKIT_SERVER_PORT");
    std::env::remove_var("DEIDKIT_SERVER_CROSS_ORIGIN_ISOLATION");
    std::env::remove_var("DEIDKIT_VERIFY_FILES");
    std::env::remove_var("DEIDKIT_VERIFY_OVERWRITE");
    std::env::remove_var("TEST_DEIDKIT_ROOT");
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r#"
[application]
log_level = "debug"

[server]
root = "public"
bind_address = "127.0.0.1"
port = 8080
cross_origin_isolation = true

[server.extra_headers]
Cache-Control = "no-store"

[verify]
recipe = "recipes/deid.dicom.basic"
files = ["scans/0001.DCM", "scans/0002.DCM"]
output_folder = "cleaned"
overwrite = false
show_header = true

[audit]
enabled = true
log_path = "/tmp/deidkit/audit.log"
json_format = false

[logging]
local_enabled = false
local_path = "/tmp/deidkit/logs"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.server.root, PathBuf::from("public"));
    assert_eq!(config.server.port, 8080);
    assert!(config.server.cross_origin_isolation);
    assert_eq!(config.server.extra_headers["Cache-Control"], "no-store");
    assert_eq!(config.verify.files.len(), 2);
    assert!(!config.verify.overwrite);
    assert!(config.verify.show_header);
    assert!(config.audit.enabled);
    assert!(!config.audit.json_format);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TEST_DEIDKIT_ROOT", "/srv/deidkit");

    let file = write_config("[server]\nroot = \"${TEST_DEIDKIT_ROOT}/wasm\"\n");
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.server.root, PathBuf::from("/srv/deidkit/wasm"));
    cleanup_env_vars();
}

#[test]
fn test_missing_substitution_variable_fails() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config("[server]\nroot = \"${TEST_DEIDKIT_ROOT}\"\n");
    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("TEST_DEIDKIT_ROOT"));
}

#[test]
fn test_env_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("DEIDKIT_SERVER_PORT", "9001");
    std::env::set_var("DEIDKIT_SERVER_CROSS_ORIGIN_ISOLATION", "true");
    std::env::set_var("DEIDKIT_VERIFY_FILES", "a.dcm, b.dcm,,c.dcm");
    std::env::set_var("DEIDKIT_VERIFY_OVERWRITE", "false");

    let file = write_config("[server]\nport = 8000\n");
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.server.port, 9001);
    assert!(config.server.cross_origin_isolation);
    assert_eq!(
        config.verify.files,
        vec![
            PathBuf::from("a.dcm"),
            PathBuf::from("b.dcm"),
            PathBuf::from("c.dcm")
        ]
    );
    assert!(!config.verify.overwrite);
    cleanup_env_vars();
}

#[test]
fn test_invalid_port_override_fails() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("DEIDKIT_SERVER_PORT", "eighty");

    let file = write_config("");
    assert!(load_config(file.path()).is_err());
    cleanup_env_vars();
}

#[test]
fn test_validation_failure_is_reported() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config("[application]\nlog_level = \"chatty\"\n");
    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("validation failed"));
}

#[test]
fn test_explicit_missing_file_is_an_error() {
    assert!(load_config_or_default(Some("/nonexistent/deidkit.toml")).is_err());
}
