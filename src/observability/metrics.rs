//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gh_transport_requests_total` (counter): requests by method, status
//! - `gh_transport_invocation_duration_seconds` (histogram): program run time
//! - `gh_transport_rejected_total` (counter): requests refused before invocation
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a request that reached the program.
pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "gh_transport_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "gh_transport_invocation_duration_seconds",
        "method" => method.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a request refused before any invocation.
pub fn record_rejection(method: &str, reason: &'static str) {
    metrics::counter!(
        "gh_transport_rejected_total",
        "method" => method.to_string(),
        "reason" => reason
    )
    .increment(1);
}
