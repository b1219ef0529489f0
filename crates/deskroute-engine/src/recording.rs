// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade; every call is a no-op until a recorder is
//! installed.

use metrics::describe_counter;

/// Register all engine metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        "deskroute_lifecycle_events_total",
        "Inbound lifecycle events handled, by kind"
    );
    describe_counter!(
        "deskroute_notices_sent_total",
        "Automated notices handed to the transport, by kind"
    );
    describe_counter!(
        "deskroute_notices_suppressed_total",
        "Automated notices not sent, by kind and reason"
    );
}

/// Record an inbound lifecycle event.
pub fn record_event(kind: &str) {
    metrics::counter!("deskroute_lifecycle_events_total", "kind" => kind.to_string()).increment(1);
}

/// Record a notice handed to the transport.
pub fn record_notice_sent(kind: &str) {
    metrics::counter!("deskroute_notices_sent_total", "kind" => kind.to_string()).increment(1);
}

/// Record a notice that was gated out or failed to send.
pub fn record_notice_suppressed(kind: &str, reason: &'static str) {
    metrics::counter!(
        "deskroute_notices_suppressed_total",
        "kind" => kind.to_string(),
        "reason" => reason
    )
    .increment(1);
}
