//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, outer layers: request id, trace, timeout, body limit)
//!     → middleware/ (authenticator → pagination → validator)
//!     → routing::dispatch (resolve, validate, call handler)
//!     → response.rs (JSON envelope, error envelope or file stream)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{request_id, ApiRequest, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
