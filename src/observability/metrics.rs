//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): search requests by method, status
//! - `gateway_request_duration_seconds` (histogram): end-to-end latency,
//!   including the upstream call and body relay

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
///
/// Failure to install is logged, not fatal: metric macros degrade to
/// no-ops without a recorder.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "metrics exporter listening"),
        Err(error) => tracing::error!(%error, "failed to install metrics exporter"),
    }
}

/// Record one completed search request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "gateway_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}
