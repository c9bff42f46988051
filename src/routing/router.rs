//! Dynamic dispatch.
//!
//! # Responsibilities
//! - Resolve the path below the base path against the controller registry
//! - Reject requests whose validator recorded errors
//! - Invoke the handler and render its outcome
//!
//! # Design Decisions
//! - Every routing miss is the same plain 404; nothing about the registry
//!   leaks to the client
//! - Validation errors short-circuit before the handler runs
//! - No retries: every failure is terminal for its request

use std::time::Instant;

use axum::{
    body::{to_bytes, Body},
    extract::{Path, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::http::request::{request_id, ApiRequest};
use crate::http::response::{render_error, render_json, stream_local_file, stream_remote};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::descriptor::{split_path, RouteDescriptor};
use crate::routing::handler::{HandlerOutcome, StreamSource};
use crate::validation::ValidationErrors;

/// Fixed body of the terminal 404.
pub const NOT_FOUND_BODY: &str = "Not found!";

/// Terminal handler for anything the registry does not know.
pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response()
}

/// Catch-all handler mounted under the base path.
pub async fn dispatch(
    State(state): State<AppState>,
    Path(path): Path<String>,
    request: Request<Body>,
) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(request.headers());
    let segments = split_path(&path);

    let Some((descriptor, handler)) = state.registry.resolve(&segments) else {
        tracing::debug!(request_id = %request_id, path = %path, "No controller matched");
        metrics::record_request("none", "none", 404, start_time);
        return not_found().await;
    };

    tracing::debug!(
        request_id = %request_id,
        version = %descriptor.version,
        controller = %descriptor.controller,
        file = ?descriptor.file,
        method = %descriptor.method,
        "Dispatching request"
    );

    let errors = request
        .extensions()
        .get::<ValidationErrors>()
        .cloned()
        .unwrap_or_default();
    if !errors.is_empty() {
        let response = render_error(ApiError::validation(errors));
        record(&descriptor, &response, start_time);
        return response;
    }

    let (parts, body) = request.into_parts();
    let api_request = match to_bytes(body, state.config.security.max_body_size).await {
        Ok(bytes) => ApiRequest::from_parts(descriptor.clone(), &parts, &bytes),
        Err(e) => Err(ApiError::bad_request(format!("Request body could not be read: {}", e))),
    };
    let api_request = match api_request {
        Ok(r) => r,
        Err(e) => {
            let response = render_error(e);
            record(&descriptor, &response, start_time);
            return response;
        }
    };

    let response = match handler(state.context.clone(), api_request).await {
        Ok(HandlerOutcome::Json(reply)) => render_json(reply),
        Ok(HandlerOutcome::Stream(source)) => {
            let streamed = match &source {
                StreamSource::LocalFile(path) => stream_local_file(path).await,
                StreamSource::RemoteUrl(url) => stream_remote(&state.client, url).await,
            };
            streamed.unwrap_or_else(render_error)
        }
        Err(e) => {
            tracing::debug!(request_id = %request_id, status = %e.status, "Handler rejected request");
            render_error(e)
        }
    };

    record(&descriptor, &response, start_time);
    response
}

fn record(descriptor: &RouteDescriptor, response: &Response, start_time: Instant) {
    metrics::record_request(
        &descriptor.controller,
        &descriptor.method,
        response.status().as_u16(),
        start_time,
    );
}
