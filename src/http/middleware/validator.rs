//! Validator loader middleware.
//! Runs the registered validator for the resolved route and records the
//! outcome in request extensions. Never rejects: the dispatch router decides.

use axum::{
    body::{to_bytes, Body},
    extract::{Path, State},
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::http::request::ApiRequest;
use crate::http::server::AppState;
use crate::routing::split_path;
use crate::validation::{ValidationError, ValidationErrors, Validator};

pub async fn validator_middleware(
    State(state): State<AppState>,
    Path(path): Path<String>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let segments = split_path(&path);
    let Some((descriptor, _)) = state.registry.resolve(&segments) else {
        return next.run(request).await;
    };
    let Some(validate) = state.validators.get(&descriptor) else {
        return next.run(request).await;
    };

    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, state.config.security.max_body_size).await {
        Ok(bytes) => bytes,
        Err(e) => {
            // Body is gone; the recorded error makes the router reject.
            tracing::debug!(error = %e, "Could not buffer body for validation");
            let mut errors = ValidationErrors::default();
            errors.push(ValidationError::new("body", "Request body could not be read."));
            let mut request = Request::from_parts(parts, Body::empty());
            request.extensions_mut().insert(errors);
            return next.run(request).await;
        }
    };

    let errors = match ApiRequest::from_parts(descriptor.clone(), &parts, &bytes) {
        Ok(api_request) => {
            let mut validator = Validator::new(&api_request);
            validate(&descriptor.method, &mut validator);
            validator.finish()
        }
        Err(_) => {
            let mut errors = ValidationErrors::default();
            errors.push(ValidationError::new("body", "Request body must be valid JSON."));
            errors
        }
    };

    if !errors.is_empty() {
        tracing::debug!(
            controller = %descriptor.controller,
            method = %descriptor.method,
            errors = errors.len(),
            "Validation failed"
        );
    }

    let mut request = Request::from_parts(parts, Body::from(bytes));
    request.extensions_mut().insert(errors);
    next.run(request).await
}
