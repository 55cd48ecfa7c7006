//! Metrics collection and exposition.
//!
//! # Metrics
//! - `shipper_records_total` (counter): records read, by outcome
//! - `shipper_spans_dropped_total` (counter): entries that failed translation
//! - `shipper_delivery_attempts_total` (counter): collector sends, by result
//! - `shipper_queue_depth` (gauge): entries waiting for delivery
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Prometheus exporter is opt-in via configuration

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with an HTTP listener on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the outcome of decoding one input record.
pub fn record_decoded(ok: bool) {
    let outcome = if ok { "decoded" } else { "malformed" };
    metrics::counter!("shipper_records_total", "outcome" => outcome).increment(1);
}

/// Record an entry dropped because it could not be translated.
pub fn record_span_dropped() {
    metrics::counter!("shipper_spans_dropped_total").increment(1);
}

/// Record one delivery attempt.
pub fn record_delivery_attempt(acknowledged: bool) {
    let result = if acknowledged { "acknowledged" } else { "failed" };
    metrics::counter!("shipper_delivery_attempts_total", "result" => result).increment(1);
}

/// Record the current queue depth.
pub fn record_queue_depth(depth: usize) {
    metrics::gauge!("shipper_queue_depth").set(depth as f64);
}
