//! Shared utilities for integration tests.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

use project_service::config::ServiceConfig;
use project_service::{HttpServer, Shutdown};

/// A running service on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// URL of an API path below the default base path.
    pub fn api(&self, path: &str) -> String {
        self.url(&format!("/project/{}", path))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the service with `config` on 127.0.0.1:0.
pub async fn start_server(mut config: ServiceConfig) -> TestServer {
    config.listener.bind_address = "127.0.0.1:0".into();
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        server.run(listener, rx).await.unwrap();
    });

    TestServer { addr, shutdown }
}

/// Serve `router` on an ephemeral port; used as a remote file store.
#[allow(dead_code)]
pub async fn start_file_store(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}
