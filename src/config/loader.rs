//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::DeidkitConfig;
use crate::domain::errors::DeidError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Default configuration file name
pub const DEFAULT_CONFIG_PATH: &str = "deidkit.toml";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into DeidkitConfig
/// 4. Applies environment variable overrides (DEIDKIT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, a referenced
/// environment variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use deidkit::config::loader::load_config;
///
/// let config = load_config("deidkit.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<DeidkitConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(DeidError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        DeidError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: DeidkitConfig = toml::from_str(&contents)
        .map_err(|e| DeidError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    finish(&mut config)?;
    Ok(config)
}

/// Loads the configuration file if one is given or the default file exists,
/// otherwise starts from built-in defaults
///
/// Environment overrides and validation apply in every case.
pub fn load_config_or_default(path: Option<&str>) -> Result<DeidkitConfig> {
    match path {
        Some(path) => load_config(path),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => load_config(DEFAULT_CONFIG_PATH),
        None => {
            tracing::debug!("No configuration file, using defaults");
            let mut config = DeidkitConfig::default();
            finish(&mut config)?;
            Ok(config)
        }
    }
}

fn finish(config: &mut DeidkitConfig) -> Result<()> {
    apply_env_overrides(config)?;
    config.validate().map_err(|e| {
        DeidError::Configuration(format!("Configuration validation failed: {}", e))
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left alone.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| DeidError::Other(format!("invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(DeidError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using DEIDKIT_* prefix
///
/// Environment variables follow the pattern: DEIDKIT_<SECTION>_<KEY>
/// For example: DEIDKIT_SERVER_PORT, DEIDKIT_VERIFY_RECIPE
fn apply_env_overrides(config: &mut DeidkitConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("DEIDKIT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Server overrides
    if let Ok(val) = std::env::var("DEIDKIT_SERVER_ROOT") {
        config.server.root = val.into();
    }
    if let Ok(val) = std::env::var("DEIDKIT_SERVER_BIND_ADDRESS") {
        config.server.bind_address = val;
    }
    if let Ok(val) = std::env::var("DEIDKIT_SERVER_PORT") {
        config.server.port = val.parse().map_err(|_| {
            DeidError::Configuration(format!("Invalid DEIDKIT_SERVER_PORT value: {val}"))
        })?;
    }
    if let Ok(val) = std::env::var("DEIDKIT_SERVER_CROSS_ORIGIN_ISOLATION") {
        config.server.cross_origin_isolation = val.parse().unwrap_or(false);
    }

    // Verify overrides
    if let Ok(val) = std::env::var("DEIDKIT_VERIFY_RECIPE") {
        config.verify.recipe = val;
    }
    if let Ok(val) = std::env::var("DEIDKIT_VERIFY_FILES") {
        config.verify.files = val
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Into::into)
            .collect();
    }
    if let Ok(val) = std::env::var("DEIDKIT_VERIFY_OUTPUT_FOLDER") {
        config.verify.output_folder = val.into();
    }
    if let Ok(val) = std::env::var("DEIDKIT_VERIFY_OVERWRITE") {
        config.verify.overwrite = val.parse().unwrap_or(true);
    }

    // Audit overrides
    if let Ok(val) = std::env::var("DEIDKIT_AUDIT_ENABLED") {
        config.audit.enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("DEIDKIT_AUDIT_LOG_PATH") {
        config.audit.log_path = val.into();
    }

    // Logging overrides
    if let Ok(val) = std::env::var("DEIDKIT_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("DEIDKIT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("DEIDKIT_LOADER_TEST_VAR", "test_value");
        let input = "recipe = \"${DEIDKIT_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "recipe = \"test_value\"\n");
        std::env::remove_var("DEIDKIT_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("DEIDKIT_LOADER_MISSING_VAR");
        let input = "recipe = \"${DEIDKIT_LOADER_MISSING_VAR}\"";
        assert!(substitute_env_vars(input).is_err());
    }

    #[test]
    fn test_substitution_skips_comments() {
        let input = "# recipe = \"${DEIDKIT_LOADER_NEVER_SET}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        assert!(load_config("nonexistent.toml").is_err());
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[server]
root = "site"
port = 9000
cross_origin_isolation = true

[verify]
recipe = "deid.dicom.basic"
files = ["a.dcm", "b.dcm"]
output_folder = "cleaned"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.server.root, std::path::PathBuf::from("site"));
        assert!(config.server.cross_origin_isolation);
        assert_eq!(config.verify.files.len(), 2);
        assert_eq!(config.verify.recipe, "deid.dicom.basic");
    }
}
