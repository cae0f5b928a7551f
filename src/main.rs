// deidkit - DICOM de-identification toolkit
// Copyright (c) 2025 deidkit Contributors
// Licensed under the MIT License

use clap::Parser;
use deidkit::cli::{Cli, Commands};
use deidkit::config::{load_config_or_default, DeidkitConfig, LoggingConfig};
use deidkit::domain::{DeidError, Result};
use deidkit::log_error_with_context;
use deidkit::logging::init_logging;
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = load_config_or_default(cli.config.as_deref());

    let log_level = cli
        .log_level
        .clone()
        .or_else(|| config.as_ref().ok().map(|c| c.application.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());
    let logging_config = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_else(|_| LoggingConfig::default());

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "deidkit - DICOM de-identification toolkit"
    );

    let exit_code = match execute_command(&cli, config).await {
        Ok(code) => code,
        Err(e) => {
            log_error_with_context!(e, "Command execution failed");
            eprintln!("Error: {e:#}");
            5
        }
    };

    // process::exit skips destructors, so flush file logs first
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, config: Result<DeidkitConfig>) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Init(args) => args.execute().await,
        Commands::Recipes(args) => args.execute().await,
        Commands::ValidateConfig(args) => args.execute(cli.config.as_deref()).await,
        Commands::Serve(args) => match config {
            Ok(config) => args.execute(config).await,
            Err(e) => Ok(config_error(&e)),
        },
        Commands::Verify(args) => match config {
            Ok(config) => args.execute(config).await,
            Err(e) => Ok(config_error(&e)),
        },
    }
}

fn config_error(error: &DeidError) -> i32 {
    log_error_with_context!(error, "Failed to load configuration");
    eprintln!("{error}");
    2
}
