//! Project service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ set/propagate x-request-id → trace → timeout → body limit
//!                         │
//!                         ├── /health
//!                         │
//!                         └── {base_path}{*path}
//!                               authenticator → pagination → validator
//!                               → dispatch (controller registry)
//!                               → controller method (helpers → database)
//!     Client Response       │
//!     ◀──────────────────── JSON envelope / error envelope / file stream
//! ```

use tokio::net::TcpListener;

use project_service::config::load_from_env;
use project_service::lifecycle::{wait_for_signal, Shutdown};
use project_service::observability::{logging, metrics};
use project_service::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_from_env()?;
    logging::init_logging(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "project-service starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        base_path = %config.api.base_path,
        request_timeout_secs = config.timeouts.request_secs,
        auth_enabled = config.auth.enabled,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    tokio::spawn(wait_for_signal(shutdown.clone()));

    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
