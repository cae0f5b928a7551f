//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for deidkit using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// deidkit - DICOM de-identification toolkit
#[derive(Parser, Debug)]
#[command(name = "deidkit")]
#[command(version, about, long_about = None)]
#[command(author = "deidkit Contributors")]
pub struct Cli {
    /// Path to configuration file (defaults to ./deidkit.toml when present)
    #[arg(short, long, env = "DEIDKIT_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "DEIDKIT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the browser front-end over HTTP
    Serve(commands::serve::ServeArgs),

    /// De-identify files with a recipe and report the result
    Verify(commands::verify::VerifyArgs),

    /// List or print the bundled recipes
    Recipes(commands::recipes::RecipesArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),
}
