//! Error type shared by handlers, helpers and the dispatch router.
//!
//! Every failure a handler reports carries the HTTP status it should be
//! rendered with. Handlers that do not care about the status use
//! [`ApiError::bad_request`], which is also what the router assumes for
//! anything unqualified.

use axum::http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Generic message used whenever internals must not leak to the client.
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong.";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Message part of an error envelope: plain text, or the field errors
/// collected by a validator.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ErrorMessage {
    Text(String),
    Fields(ValidationErrors),
}

impl std::fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorMessage::Text(text) => f.write_str(text),
            ErrorMessage::Fields(errors) => write!(f, "{} validation error(s)", errors.len()),
        }
    }
}

/// A failure that is rendered as `{status, message, result?}`.
#[derive(Debug, Error)]
#[error("{status}: {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: ErrorMessage,
    pub result: Option<Value>,
    #[source]
    pub source: Option<BoxError>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: ErrorMessage::Text(message.into()),
            result: None,
            source: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    /// Opaque 500; the cause is only kept for logging.
    pub fn internal(source: impl Into<BoxError>) -> Self {
        Self {
            source: Some(source.into()),
            ..Self::new(StatusCode::INTERNAL_SERVER_ERROR, SOMETHING_WENT_WRONG)
        }
    }

    pub fn validation(errors: ValidationErrors) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: ErrorMessage::Fields(errors),
            result: None,
            source: None,
        }
    }

    pub fn with_result(mut self, result: Value) -> Self {
        self.result = Some(result);
        self
    }
}
