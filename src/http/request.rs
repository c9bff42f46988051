//! Request handling and transformation.
//!
//! # Responsibilities
//! - Carry the request ID generated by the outer layers
//! - Turn the raw axum request into the [`ApiRequest`] handlers consume
//! - Parse the JSON body once the route is known
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - An empty body is an empty JSON object, never an error
//! - Query keys consumed by pagination are already gone by the time the
//!   query map is built

use std::collections::HashMap;

use axum::http::{request::Parts, HeaderMap, Method};
use serde_json::Value;

use crate::error::ApiError;
use crate::http::middleware::{Pagination, UserDetails};
use crate::routing::RouteDescriptor;

/// Header carrying the correlation id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Correlation id of a request, or "unknown" when the layer did not run.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Everything a handler gets to see about the inbound request.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub descriptor: RouteDescriptor,
    pub method: Method,
    pub headers: HeaderMap,
    pub query: HashMap<String, String>,
    pub body: Value,
    pub pagination: Pagination,
    pub user: Option<UserDetails>,
}

impl ApiRequest {
    /// Assemble the request from its head and buffered body.
    pub fn from_parts(
        descriptor: RouteDescriptor,
        parts: &Parts,
        body: &[u8],
    ) -> Result<Self, ApiError> {
        let body = if body.iter().all(u8::is_ascii_whitespace) {
            Value::Object(Default::default())
        } else {
            serde_json::from_slice(body)
                .map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {}", e)))?
        };

        let query = parts
            .uri
            .query()
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();

        Ok(Self {
            descriptor,
            method: parts.method.clone(),
            headers: parts.headers.clone(),
            query,
            body,
            pagination: parts.extensions.get::<Pagination>().cloned().unwrap_or_default(),
            user: parts.extensions.get::<UserDetails>().cloned(),
        })
    }

    /// The trailing `_id` segment, or a 400 naming what was expected.
    pub fn require_id(&self, message: &str) -> Result<&str, ApiError> {
        self.descriptor
            .id
            .as_deref()
            .ok_or_else(|| ApiError::bad_request(message))
    }

    /// Id recorded as `createdBy`/`updatedBy`.
    pub fn actor(&self) -> String {
        self.user
            .as_ref()
            .and_then(|u| u.user_id.clone())
            .unwrap_or_else(|| "SYSTEM".to_string())
    }

    #[cfg(test)]
    pub(crate) fn for_test(descriptor: RouteDescriptor, body: Value) -> Self {
        Self {
            descriptor,
            method: Method::POST,
            headers: HeaderMap::new(),
            query: HashMap::new(),
            body,
            pagination: Pagination::default(),
            user: None,
        }
    }
}
