// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory log port that keeps every record for assertions.

use std::sync::{Mutex, PoisonError};

use deskroute_core::{LogLevel, LogPort, LogRecord, LogSink};

/// Captures categorized log records in arrival order.
#[derive(Default)]
pub struct MemoryLogPort {
    records: Mutex<Vec<LogRecord>>,
}

impl MemoryLogPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Records written to one sink.
    pub fn for_sink(&self, sink: LogSink) -> Vec<LogRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.sink == sink)
            .collect()
    }

    /// Whether a record with this sink, level and message was written.
    pub fn contains(&self, sink: LogSink, level: LogLevel, message: &str) -> bool {
        self.records()
            .iter()
            .any(|r| r.sink == sink && r.level == level && r.message == message)
    }

    pub fn clear(&self) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl LogPort for MemoryLogPort {
    fn record(&self, record: LogRecord) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }
}
