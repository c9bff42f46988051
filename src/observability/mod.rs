//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Every request produces:
//!     → logging.rs (structured log events, the response log banner)
//!     → metrics.rs (request counter and latency histogram per route)
//!
//! Consumers:
//!     → stdout (tracing-subscriber fmt layer)
//!     → Metrics endpoint (Prometheus scrape, when enabled)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line via the trace span
//! - Metrics are recorded whether or not an exporter is installed

pub mod logging;
pub mod metrics;
