// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`LogPort`] implementation that forwards to `tracing`.
//!
//! Each sink maps to its own target so subscribers can filter or route them
//! independently, e.g. `RUST_LOG=deskroute::integration=debug`.

use crate::traits::observability::{LogLevel, LogPort, LogRecord, LogSink};

pub const BUSINESS_TARGET: &str = "deskroute::business";
pub const INTEGRATION_TARGET: &str = "deskroute::integration";
pub const SYSTEM_TARGET: &str = "deskroute::system";

/// Forwards log records to the installed `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogPort;

impl TracingLogPort {
    pub fn new() -> Self {
        Self
    }
}

/// Callsite metadata is static, so target and level must be literals.
macro_rules! emit {
    ($target:expr, $record:expr) => {{
        let fields = $record.render_fields();
        let sink = $record.sink.to_string();
        match $record.level {
            LogLevel::Debug => {
                tracing::debug!(
                    target: $target,
                    sink = %sink,
                    fields = %fields,
                    "{}",
                    $record.message
                )
            }
            LogLevel::Info => {
                tracing::info!(
                    target: $target,
                    sink = %sink,
                    fields = %fields,
                    "{}",
                    $record.message
                )
            }
            LogLevel::Warn => {
                tracing::warn!(
                    target: $target,
                    sink = %sink,
                    fields = %fields,
                    "{}",
                    $record.message
                )
            }
            LogLevel::Error => {
                tracing::error!(
                    target: $target,
                    sink = %sink,
                    fields = %fields,
                    "{}",
                    $record.message
                )
            }
        }
    }};
}

impl LogPort for TracingLogPort {
    fn record(&self, record: LogRecord) {
        match record.sink {
            LogSink::Business => emit!(BUSINESS_TARGET, record),
            LogSink::Integration => emit!(INTEGRATION_TARGET, record),
            LogSink::System => emit!(SYSTEM_TARGET, record),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_sink_and_level_is_accepted() {
        let port = TracingLogPort::new();
        for sink in [LogSink::Business, LogSink::Integration, LogSink::System] {
            for level in [LogLevel::Debug, LogLevel::Info, LogLevel::Warn, LogLevel::Error] {
                port.record(LogRecord::new(sink, level, "sample").field("cons_id", "42"));
            }
        }
    }

    #[test]
    fn targets_share_the_crate_prefix() {
        for target in [BUSINESS_TARGET, INTEGRATION_TARGET, SYSTEM_TARGET] {
            assert!(target.starts_with("deskroute::"));
        }
    }
}
