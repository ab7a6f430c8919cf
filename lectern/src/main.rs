mod server;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use lectern_core::{config::load_config, logging, SessionHub};

use server::LecternServer;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load and validate configuration (fail fast on misconfigurations)
    let config = load_config()?;

    // 2. Initialize logging
    logging::init_logging(&config.logging)?;
    info!("Lectern signaling relay starting...");
    info!("HTTP address: {}", config.http_address());

    // 3. Initialize the session hub. Exactly one per process: peers in the
    // same session must reach the same registry instance.
    let hub = Arc::new(SessionHub::new());
    info!("Session hub initialized");

    // 4. Start the HTTP server and wait for shutdown
    let server = LecternServer::new(Arc::new(config), hub);
    server.start().await
}
