//! Static file server
//!
//! Serves a directory over HTTP for the browser front-end. With cross-origin
//! isolation enabled every response, errors included, carries the
//! `Cross-Origin-Opener-Policy` and `Cross-Origin-Embedder-Policy` headers
//! that the browser requires before it hands out shared memory to the
//! sandboxed runtime.
//!
//! # Example
//!
//! ```rust,no_run
//! use deidkit::config::ServerConfig;
//! use deidkit::server::StaticServer;
//!
//! # async fn example() -> deidkit::domain::Result<()> {
//! let config = ServerConfig {
//!     cross_origin_isolation: true,
//!     ..ServerConfig::default()
//! };
//! let server = StaticServer::bind(&config).await?;
//! println!("listening on {}", server.local_addr());
//! server.run().await?;
//! # Ok(())
//! # }
//! ```

use crate::config::ServerConfig;
use crate::domain::{DeidError, Result};
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

/// Headers emitted by the isolation variant
pub const ISOLATION_HEADERS: [(&str, &str); 2] = [
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-embedder-policy", "require-corp"),
];

/// Server settings resolved from [`ServerConfig`]
pub struct StaticServer {
    root: PathBuf,
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl StaticServer {
    /// Resolve the header set for a configuration
    ///
    /// # Errors
    ///
    /// Returns `DeidError::Configuration` if an extra header name or value
    /// is not valid HTTP.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let mut headers = Vec::new();

        for (name, value) in &config.extra_headers {
            let name = HeaderName::try_from(name.as_str()).map_err(|e| {
                DeidError::Configuration(format!("Invalid header name '{name}': {e}"))
            })?;
            let value = HeaderValue::try_from(value.as_str()).map_err(|e| {
                DeidError::Configuration(format!("Invalid value for header '{name}': {e}"))
            })?;
            if config.cross_origin_isolation
                && ISOLATION_HEADERS.iter().any(|(isolated, _)| name == *isolated)
            {
                tracing::warn!(
                    header = %name,
                    "Ignoring extra header that would replace an isolation header"
                );
                continue;
            }
            headers.push((name, value));
        }

        // Layers added last wrap the others and write last
        if config.cross_origin_isolation {
            for (name, value) in ISOLATION_HEADERS {
                headers.push((
                    HeaderName::from_static(name),
                    HeaderValue::from_static(value),
                ));
            }
        }

        Ok(Self {
            root: config.root.clone(),
            headers,
        })
    }

    /// Build the router serving `root` with the configured headers
    pub fn router(&self) -> Router {
        let mut router = Router::new().fallback_service(ServeDir::new(&self.root));

        for (name, value) in &self.headers {
            router = router.layer(SetResponseHeaderLayer::overriding(
                name.clone(),
                value.clone(),
            ));
        }

        router.layer(TraceLayer::new_for_http())
    }

    /// Bind the listener described by `config`
    ///
    /// # Errors
    ///
    /// Returns `DeidError::Server` if the address is already in use or
    /// cannot be bound. No retry is attempted.
    pub async fn bind(config: &ServerConfig) -> Result<BoundServer> {
        let server = Self::from_config(config)?;
        let ip: IpAddr = config.bind_address.parse().map_err(|_| {
            DeidError::Configuration(format!(
                "Invalid bind address '{}'",
                config.bind_address
            ))
        })?;
        let addr = SocketAddr::new(ip, config.port);

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| DeidError::Server(format!("Failed to bind {addr}: {e}")))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| DeidError::Server(format!("Failed to read bound address: {e}")))?;

        tracing::info!(
            address = %local_addr,
            root = %server.root.display(),
            isolation = config.cross_origin_isolation,
            "Static server bound"
        );

        Ok(BoundServer {
            listener,
            local_addr,
            router: server.router(),
        })
    }
}

/// A server whose listener is bound but not yet accepting
pub struct BoundServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    router: Router,
}

impl BoundServer {
    /// The address actually bound, which differs from the configured one
    /// when port 0 was requested
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve until the process is terminated
    pub async fn run(self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Serve until `shutdown` resolves, then finish in-flight requests
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| DeidError::Server(format!("Server stopped: {e}")))
    }
}
