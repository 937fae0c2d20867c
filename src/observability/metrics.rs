//! Metrics collection and exposition.
//!
//! # Metrics
//! - `devserver_requests_total` (counter): requests by route, status
//! - `devserver_request_duration_seconds` (histogram): latency by route
//! - `devserver_upstream_requests_total` (counter): proxy calls by upstream, outcome
//! - `devserver_upstream_duration_seconds` (histogram): proxy latency by upstream
//!
//! Without an installed recorder every call is a no-op.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

pub fn record_request(route: &'static str, status: u16, start: Instant) {
    counter!(
        "devserver_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("devserver_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream(upstream: &'static str, outcome: &'static str, start: Instant) {
    counter!(
        "devserver_upstream_requests_total",
        "upstream" => upstream,
        "outcome" => outcome
    )
    .increment(1);
    histogram!("devserver_upstream_duration_seconds", "upstream" => upstream)
        .record(start.elapsed().as_secs_f64());
}
