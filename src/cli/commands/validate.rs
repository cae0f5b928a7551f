//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the deidkit configuration file.

use crate::config::load_config_or_default;
use crate::deid::recipe::DeidRecipe;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        tracing::info!(config_path = ?config_path, "Validating configuration");

        let config = match load_config_or_default(config_path) {
            Ok(c) => {
                println!("Configuration is valid");
                c
            }
            Err(e) => {
                println!("Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Server Root: {}", config.server.root.display());
        println!(
            "  Server Address: {}:{}",
            config.server.bind_address, config.server.port
        );
        println!(
            "  Cross-Origin Isolation: {}",
            config.server.cross_origin_isolation
        );
        println!("  Recipe: {}", config.verify.recipe);
        println!("  Files: {:?}", config.verify.files);
        println!("  Output Folder: {}", config.verify.output_folder.display());
        println!("  Audit: {}", config.audit.enabled);
        println!();

        if let Err(e) = DeidRecipe::load(&config.verify.recipe) {
            println!("Recipe '{}' cannot be loaded", config.verify.recipe);
            println!("   Error: {e}");
            return Ok(2);
        }

        Ok(0)
    }
}
