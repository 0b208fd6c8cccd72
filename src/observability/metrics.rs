//! Metrics collection and exposition.
//!
//! # Metrics
//! - `shoplog_requests_total` (counter): requests by method, status
//! - `shoplog_request_duration_seconds` (histogram): latency distribution
//! - `shoplog_records_appended_total` (counter): records written to tenant logs
//! - `shoplog_lines_skipped_total` (counter): malformed lines dropped on read
//!
//! # Design Decisions
//! - No tenant label: the set of tenants is unbounded
//! - Without an installed recorder every call is a no-op

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install Prometheus recorder"),
    }
}

/// Record a completed HTTP request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
    ];
    counter!("shoplog_requests_total", &labels).increment(1);
    histogram!("shoplog_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

/// Record one record written to a tenant log.
pub fn record_append() {
    counter!("shoplog_records_appended_total").increment(1);
}

/// Record lines dropped by the skip read policy.
pub fn record_skipped_lines(count: usize) {
    counter!("shoplog_lines_skipped_total").increment(count as u64);
}
