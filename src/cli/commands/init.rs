//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::config::DEFAULT_CONFIG_PATH;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Validate configuration: deidkit validate-config");
                println!("  3. Clean files: deidkit verify <FILES>");
                println!("  4. Serve the browser front-end: deidkit serve --isolation");
                Ok(0)
            }
            Err(e) => {
                println!("Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }

    /// Sample configuration with every setting at its default
    fn generate_config() -> String {
        r#"# deidkit configuration
#
# Every value below is the built-in default. Values may reference environment
# variables as ${VAR_NAME}, and DEIDKIT_<SECTION>_<KEY> variables override
# the file.

[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

[server]
# Directory served at /
root = "wasm"
bind_address = "0.0.0.0"
port = 8000

# Send Cross-Origin-Opener-Policy and Cross-Origin-Embedder-Policy on every
# response; the browser front-end needs them for shared memory
cross_origin_isolation = false

# Additional response headers
# [server.extra_headers]
# Cache-Control = "no-store"

[verify]
# Recipe file path, or a bundled recipe name (see: deidkit recipes)
recipe = "deid.dicom"
files = ["0002.DCM"]
output_folder = "deid_output"
overwrite = true
show_header = false

[audit]
# JSON lines per cleaned file; original values are stored as SHA-256 hashes
enabled = false
log_path = "./audit/deid.log"
json_format = true

[logging]
local_enabled = false
local_path = "./logs"
# daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}
