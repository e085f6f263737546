//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): forwarded requests by method, status, profile
//! - `proxy_request_duration_seconds` (histogram): end-to-end forwarding latency
//! - `generation_requests_total` (counter): generation calls by outcome
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - The Prometheus exporter is installed only when enabled in config

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one completed forwarding cycle.
pub fn record_request(method: &str, status: u16, profile: &str, start: Instant) {
    metrics::counter!(
        "proxy_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "profile" => profile.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "proxy_request_duration_seconds",
        "profile" => profile.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record one generation call; `outcome` is `ok` or a short error label.
pub fn record_generation(outcome: &'static str) {
    metrics::counter!("generation_requests_total", "outcome" => outcome).increment(1);
}
