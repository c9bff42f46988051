//! Response rendering.
//!
//! # Responsibilities
//! - Render handler outcomes as JSON envelopes
//! - Render errors as `{status, message, result?}`
//! - Stream file downloads from disk or from a remote URL
//!
//! # Design Decisions
//! - Streaming responses avoid buffering the entire body
//! - Stream failures never leak their cause; the client gets a generic 500
//! - `data` from a handler is never emitted, only `result`

use std::path::Path;

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tokio_util::io::ReaderStream;
use uuid::Uuid;

use crate::error::{ApiError, ErrorMessage};
use crate::routing::JsonReply;

pub const RESPONSE_LOG_START: &str = "-------Response log starts here-------";
pub const RESPONSE_LOG_END: &str = "-------Response log ends here-------";

/// Body of a successful JSON response.
#[derive(Debug, Serialize)]
pub struct SuccessBody {
    pub message: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

/// Body of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub message: ErrorMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl SuccessBody {
    pub fn from_reply(reply: JsonReply) -> (StatusCode, Self) {
        let status = reply.status.unwrap_or(StatusCode::OK);
        let body = Self {
            message: reply.message,
            status: status.as_u16(),
            result: reply.result,
            total: reply.total,
            count: reply.count,
        };
        (status, body)
    }
}

impl ErrorBody {
    pub fn from_error(error: ApiError) -> (StatusCode, Self) {
        let body = Self {
            status: error.status.as_u16(),
            message: error.message,
            result: error.result,
        };
        (error.status, body)
    }
}

/// Write a rendered body to the log between the fixed banner lines.
pub fn log_response<T: Serialize>(body: &T) {
    tracing::info!("{}", RESPONSE_LOG_START);
    match serde_json::to_string(body) {
        Ok(serialized) => tracing::info!("{}", serialized),
        Err(e) => tracing::warn!(error = %e, "Could not serialize response for logging"),
    }
    tracing::info!("{}", RESPONSE_LOG_END);
}

pub fn render_json(reply: JsonReply) -> Response {
    let (status, body) = SuccessBody::from_reply(reply);
    log_response(&body);
    (status, Json(body)).into_response()
}

pub fn render_error(error: ApiError) -> Response {
    if let Some(source) = &error.source {
        tracing::error!(status = %error.status, error = %source, "Request failed");
    }
    let (status, body) = ErrorBody::from_error(error);
    log_response(&body);
    (status, Json(body)).into_response()
}

/// Pipe a local file to the client as an attachment.
pub async fn stream_local_file(path: &Path) -> Result<Response, ApiError> {
    let file = tokio::fs::File::open(path).await.map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "File to stream is not readable");
        ApiError::internal(e)
    })?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ApiError::internal("file path has no final segment"))?;

    Response::builder()
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={}", file_name),
        )
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(ApiError::internal)
}

/// Download name for a remote file: a fresh UUID plus the URL's extension.
pub fn remote_file_name(url: &str) -> String {
    let extension = url::Url::parse(url)
        .ok()
        .and_then(|u| {
            Path::new(u.path())
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_string)
        })
        .filter(|e| !e.is_empty());

    match extension {
        Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
        None => Uuid::new_v4().to_string(),
    }
}

/// Pipe a remote resource to the client, forwarding its content type.
pub async fn stream_remote(client: &reqwest::Client, url: &str) -> Result<Response, ApiError> {
    let upstream = client.get(url).send().await.map_err(|e| {
        tracing::error!(url = %url, error = %e, "Remote file fetch failed");
        ApiError::internal(e)
    })?;

    let upstream = upstream.error_for_status().map_err(|e| {
        tracing::error!(url = %url, error = %e, "Remote file fetch returned an error status");
        ApiError::internal(e)
    })?;

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("application/octet-stream"));

    Response::builder()
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={}", remote_file_name(url)),
        )
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from_stream(upstream.bytes_stream()))
        .map_err(ApiError::internal)
}
