// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Categorized logging port.
//!
//! Every call site chooses one of three sinks explicitly:
//! - [`LogSink::Business`]: assignments, transitions, notices, ratings
//! - [`LogSink::Integration`]: traffic with the chat platform and other upstreams
//! - [`LogSink::System`]: store failures and degraded reads

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Named log category.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LogSink {
    Business,
    Integration,
    System,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// One structured log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub sink: LogSink,
    pub level: LogLevel,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

impl LogRecord {
    pub fn new(sink: LogSink, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            sink,
            level,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    pub fn business(level: LogLevel, message: impl Into<String>) -> Self {
        Self::new(LogSink::Business, level, message)
    }

    pub fn integration(level: LogLevel, message: impl Into<String>) -> Self {
        Self::new(LogSink::Integration, level, message)
    }

    pub fn system(level: LogLevel, message: impl Into<String>) -> Self {
        Self::new(LogSink::System, level, message)
    }

    /// Attach a key/value field.
    pub fn field(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.fields.push((key.to_string(), value.to_string()));
        self
    }

    pub fn field_value(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Fields rendered as `k=v k=v`.
    pub fn render_fields(&self) -> String {
        self.fields
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Destination for categorized log records.
pub trait LogPort: Send + Sync {
    fn record(&self, record: LogRecord);
}
