//! Authenticator middleware.
//! Populates [`UserDetails`] for the handlers and, when enabled, enforces the
//! internal access token.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::http::response::render_error;
use crate::http::server::AppState;

pub const INTERNAL_ACCESS_TOKEN: &str = "internal-access-token";
pub const X_USER_ID: &str = "x-user-id";

/// Caller identity attached to authenticated requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserDetails {
    pub user_id: Option<String>,
    pub token: Option<String>,
}

impl UserDetails {
    fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Self {
            user_id: header(X_USER_ID),
            token: header(INTERNAL_ACCESS_TOKEN),
        }
    }
}

pub async fn authenticator_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let details = UserDetails::from_headers(req.headers());
    let auth = &state.config.auth;

    if auth.enabled && details.token.as_deref() != Some(auth.internal_access_token.as_str()) {
        tracing::warn!(path = %req.uri().path(), "Rejected request without a valid access token");
        return render_error(ApiError::unauthorized()).into_response();
    }

    req.extensions_mut().insert(details);
    next.run(req).await
}
