//! Serve command implementation
//!
//! This module implements the `serve` command, which hosts the browser
//! front-end from a local directory.

use crate::config::DeidkitConfig;
use crate::server::StaticServer;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Directory to serve (overrides server.root)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Port to listen on (overrides server.port)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind (overrides server.bind_address)
    #[arg(long)]
    pub bind: Option<String>,

    /// Send cross-origin isolation headers on every response
    #[arg(long)]
    pub isolation: bool,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(&self, mut config: DeidkitConfig) -> anyhow::Result<i32> {
        if let Some(root) = &self.root {
            tracing::info!(root = %root.display(), "Overriding server root from CLI");
            config.server.root = root.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(bind) = &self.bind {
            config.server.bind_address = bind.clone();
        }
        if self.isolation {
            config.server.cross_origin_isolation = true;
        }

        if !config.server.root.is_dir() {
            tracing::warn!(
                root = %config.server.root.display(),
                "Server root is not a directory, every request will return 404"
            );
        }

        let server = match StaticServer::bind(&config.server).await {
            Ok(server) => server,
            Err(e) => {
                tracing::error!(error = %e, "Failed to start server");
                eprintln!("Failed to start server: {e}");
                return Ok(5);
            }
        };

        let port = server.local_addr().port();
        println!("Serving at port {port}");
        if config.server.cross_origin_isolation {
            println!("Open http://localhost:{port}/ in your browser.");
        }

        server
            .run_until(async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                    std::future::pending::<()>().await;
                }
                tracing::info!("Received SIGINT (Ctrl+C), shutting down");
            })
            .await?;

        Ok(0)
    }
}
