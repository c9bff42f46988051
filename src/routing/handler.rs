//! Handler contract and the values handlers resolve to.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use axum::http::StatusCode;
use futures_util::future::BoxFuture;
use serde_json::Value;

use crate::context::ServiceContext;
use crate::error::ApiError;
use crate::http::ApiRequest;

pub type HandlerResult = Result<HandlerOutcome, ApiError>;

/// Boxed handler for type erasure
pub type BoxedHandler =
    Arc<dyn Fn(ServiceContext, ApiRequest) -> BoxFuture<'static, HandlerResult> + Send + Sync>;

/// Trait for handler functions
///
/// Automatically implemented for async functions with the signature:
/// `async fn(ServiceContext, ApiRequest) -> HandlerResult`
pub trait Handler: Clone + Send + Sync + 'static {
    type Future: Future<Output = HandlerResult> + Send + 'static;

    fn call(&self, ctx: ServiceContext, request: ApiRequest) -> Self::Future;
}

impl<F, Fut> Handler for F
where
    F: Fn(ServiceContext, ApiRequest) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    type Future = Fut;

    fn call(&self, ctx: ServiceContext, request: ApiRequest) -> Self::Future {
        (self)(ctx, request)
    }
}

/// Convert a handler into a boxed handler for storage
pub(crate) fn into_boxed<H: Handler>(handler: H) -> BoxedHandler {
    Arc::new(
        move |ctx: ServiceContext, request: ApiRequest| -> BoxFuture<'static, HandlerResult> {
            Box::pin(handler.call(ctx, request))
        },
    )
}

/// What a handler asks the router to send back.
#[derive(Debug)]
pub enum HandlerOutcome {
    /// Bytes piped from a file or a remote URL.
    Stream(StreamSource),
    /// A `{message, status, result, total, count}` envelope.
    Json(JsonReply),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamSource {
    LocalFile(PathBuf),
    RemoteUrl(String),
}

/// JSON outcome of a handler.
///
/// `data` is accepted for compatibility with handlers that fill it, but the
/// rendered envelope only ever carries `result`.
#[derive(Debug, Clone, Default)]
pub struct JsonReply {
    pub status: Option<StatusCode>,
    pub message: String,
    pub data: Option<Value>,
    pub result: Option<Value>,
    pub total: Option<u64>,
    pub count: Option<u64>,
}

impl JsonReply {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn result(mut self, result: Value) -> Self {
        self.result = Some(result);
        self
    }

    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    pub fn count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }
}

impl From<JsonReply> for HandlerOutcome {
    fn from(reply: JsonReply) -> Self {
        HandlerOutcome::Json(reply)
    }
}

impl From<StreamSource> for HandlerOutcome {
    fn from(source: StreamSource) -> Self {
        HandlerOutcome::Stream(source)
    }
}
