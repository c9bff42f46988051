//! Metrics collection and exposition.
//!
//! # Metrics
//! - `project_requests_total` (counter): requests by controller, method, status
//! - `project_request_duration_seconds` (histogram): latency by controller, method
//!
//! Requests that never resolve to a handler are recorded under
//! controller `none`.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

pub const REQUESTS_TOTAL: &str = "project_requests_total";
pub const REQUEST_DURATION: &str = "project_request_duration_seconds";

/// Record one finished request.
pub fn record_request(controller: &str, method: &str, status: u16, start: Instant) {
    metrics::counter!(
        REQUESTS_TOTAL,
        "controller" => controller.to_string(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    metrics::histogram!(
        REQUEST_DURATION,
        "controller" => controller.to_string(),
        "method" => method.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, address = %addr, "Failed to install metrics exporter"),
    }
}
