//! Verify command implementation
//!
//! This module implements the `verify` command: load a recipe, clean the
//! given files into an output folder and print a one-line result.

use crate::config::DeidkitConfig;
use crate::core::verify::VerifyJob;
use crate::deid::audit::AuditLogger;
use crate::deid::dataset::{dump_header, read_file};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the verify command
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Recipe file or bundled recipe name (overrides verify.recipe)
    #[arg(short, long)]
    pub recipe: Option<String>,

    /// Output folder (overrides verify.output_folder)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Keep outputs that already exist
    #[arg(long)]
    pub no_overwrite: bool,

    /// Print the header of the first cleaned file
    #[arg(long)]
    pub show_header: bool,

    /// Files to de-identify (overrides verify.files)
    pub files: Vec<PathBuf>,
}

impl VerifyArgs {
    /// Execute the verify command
    pub async fn execute(&self, mut config: DeidkitConfig) -> anyhow::Result<i32> {
        tracing::info!("Starting verify command");
        self.apply_overrides(&mut config);

        let job = match VerifyJob::new(config.verify.clone()) {
            Ok(job) => job,
            Err(e) => {
                tracing::error!(error = %e, recipe = %config.verify.recipe, "Failed to load recipe");
                println!("Error loading recipe: {e}");
                return Ok(1);
            }
        };

        let job = if config.audit.enabled {
            let audit = AuditLogger::new(config.audit.log_path.clone(), config.audit.json_format)?;
            tracing::info!(path = %config.audit.log_path.display(), "Audit logging enabled");
            job.with_audit(audit)
        } else {
            job
        };

        let summary = job.run()?;
        println!("{}", summary.message());

        if config.verify.show_header {
            if let Some(first) = summary.first_output() {
                match read_file(first) {
                    Ok(obj) => print!("{}", dump_header(&obj)),
                    Err(e) => {
                        tracing::warn!(path = %first.display(), error = %e, "Cleaned file could not be read back");
                    }
                }
            }
        }

        Ok(0)
    }

    fn apply_overrides(&self, config: &mut DeidkitConfig) {
        if let Some(recipe) = &self.recipe {
            tracing::info!(recipe = %recipe, "Overriding recipe from CLI");
            config.verify.recipe = recipe.clone();
        }
        if let Some(output) = &self.output {
            config.verify.output_folder = output.clone();
        }
        if !self.files.is_empty() {
            config.verify.files = self.files.clone();
        }
        if self.no_overwrite {
            config.verify.overwrite = false;
        }
        if self.show_header {
            config.verify.show_header = true;
        }
    }
}
