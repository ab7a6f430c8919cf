//! Server lifecycle management
//!
//! Binds the HTTP listener and runs it until a shutdown signal arrives.
//! Failure to bind is the one error that terminates the process; everything
//! past startup is contained per-connection by the relay itself.

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};

use lectern_core::{Config, SessionHub};

/// Lectern server - owns the hub and the HTTP listener
pub struct LecternServer {
    config: Arc<Config>,
    hub: Arc<SessionHub>,
}

impl LecternServer {
    /// Create a new server instance
    pub const fn new(config: Arc<Config>, hub: Arc<SessionHub>) -> Self {
        Self { config, hub }
    }

    /// Start the HTTP server and wait for a shutdown signal
    pub async fn start(self) -> anyhow::Result<()> {
        let router = lectern_api::http::create_router(self.hub.clone(), self.config.clone());

        let http_address = self.config.http_address();
        let http_addr: std::net::SocketAddr = http_address
            .parse()
            .with_context(|| format!("Invalid HTTP address '{http_address}'"))?;

        let listener = tokio::net::TcpListener::bind(http_addr)
            .await
            .with_context(|| format!("Failed to bind HTTP address {http_addr}"))?;

        info!("HTTP server listening on {}", http_addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server error")?;

        info!("Lectern shut down gracefully");
        Ok(())
    }
}

/// Wait for a shutdown signal (SIGTERM or SIGINT/Ctrl+C)
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl+C signal");
            }
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                info!("Received SIGTERM signal");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
