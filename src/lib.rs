//! Project service library.
//!
//! A generic CRUD REST backend: every request below the base path is
//! resolved by the dynamic dispatch router to a registered controller
//! method, validated, paginated and answered with a uniform envelope.

// Core subsystems
pub mod config;
pub mod context;
pub mod database;
pub mod error;
pub mod http;
pub mod routing;
pub mod validation;

// Domain
pub mod controllers;
pub mod helpers;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::ServiceConfig;
pub use context::ServiceContext;
pub use error::ApiError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
