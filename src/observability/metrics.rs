//! Metrics collection.
//!
//! # Metrics
//! - `har_entries_written_total` (counter): entries handed to the writer
//! - `har_entries_suppressed_total` (counter): entries dropped by the rewrite hook
//! - `har_capture_errors_total` (counter): exchanges aborted by capture, by stage
//! - `har_transport_errors_total` (counter): exchanges failed by the inner transport
//! - `har_exchange_duration_seconds` (histogram): wall-clock span of recorded exchanges

use std::time::Duration;

pub fn record_entry_written(method: &str, status: u16, elapsed: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
    ];
    metrics::counter!("har_entries_written_total", &labels).increment(1);
    metrics::histogram!("har_exchange_duration_seconds", &labels).record(elapsed.as_secs_f64());
}

pub fn record_entry_suppressed() {
    metrics::counter!("har_entries_suppressed_total").increment(1);
}

pub fn record_capture_error(stage: &'static str) {
    metrics::counter!("har_capture_errors_total", "stage" => stage).increment(1);
}

pub fn record_transport_error() {
    metrics::counter!("har_transport_errors_total").increment(1);
}
