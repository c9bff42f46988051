//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the dispatch handler under the base path
//! - Wire up middleware (tracing, timeout, body limit, request ID)
//! - Wire up the request pipeline (authenticator, pagination, validator)
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::HeaderName,
    middleware,
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::context::ServiceContext;
use crate::controllers;
use crate::database::Database;
use crate::http::middleware::{
    authenticator_middleware, pagination_middleware, validator_middleware,
};
use crate::http::request::X_REQUEST_ID;
use crate::routing::{dispatch, not_found, ControllerRegistry};
use crate::validation::{self, ValidatorRegistry};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ControllerRegistry>,
    pub validators: Arc<ValidatorRegistry>,
    pub context: ServiceContext,
    pub client: reqwest::Client,
    pub config: Arc<ServiceConfig>,
}

/// HTTP server for the project service.
pub struct HttpServer {
    router: Router,
    config: Arc<ServiceConfig>,
}

impl HttpServer {
    /// Create a server with every built-in controller and validator.
    pub fn new(config: ServiceConfig) -> Self {
        let config = Arc::new(config);
        let context = ServiceContext::new(Database::new(), config.clone());
        Self::with_registries(config, controllers::registry(), validation::entities::registry(), context)
    }

    /// Create a server over explicit registries and context.
    pub fn with_registries(
        config: Arc<ServiceConfig>,
        registry: ControllerRegistry,
        validators: ValidatorRegistry,
        context: ServiceContext,
    ) -> Self {
        tracing::info!(
            handlers = registry.len(),
            validators = validators.len(),
            base_path = %config.api.base_path,
            "Controller registry built"
        );
        for route in registry.routes() {
            tracing::debug!(
                version = %route.version,
                controller = %route.controller,
                file = ?route.file,
                method = %route.method,
                "Route registered"
            );
        }

        // Remote fetches are bounded; everything else relies on the request timeout.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.upstream_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default HTTP client");
                reqwest::Client::new()
            });

        let state = AppState {
            registry: Arc::new(registry),
            validators: Arc::new(validators),
            context,
            client,
            config: config.clone(),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        // Layers run bottom-up: authenticator, pagination, validator, dispatch.
        let api = Router::new()
            .route("/{*path}", any(dispatch))
            .route_layer(middleware::from_fn_with_state(state.clone(), validator_middleware))
            .route_layer(middleware::from_fn(pagination_middleware))
            .route_layer(middleware::from_fn_with_state(state.clone(), authenticator_middleware))
            .with_state(state);

        let app = match config.api.mount_point() {
            Some(base) => Router::new().nest(&base, api),
            None => api,
        };

        let request_id = HeaderName::from_static(X_REQUEST_ID);
        app.route("/health", get(health))
            .fallback(not_found)
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
    }

    /// The assembled router, for serving or for driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            base_path = %self.config.api.base_path,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub version: &'static str,
    pub status: &'static str,
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
    })
}
