// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Port definitions consumed by the engine.
//!
//! Adapters extend the [`PluginAdapter`] base trait where they own a resource
//! and use `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod observability;
pub mod storage;
pub mod transport;

pub use adapter::PluginAdapter;
pub use observability::{LogLevel, LogPort, LogRecord, LogSink};
pub use storage::{
    ConsultationStore, ManagerDirectory, NotificationLedger, ResolutionStats, StorageAdapter,
};
pub use transport::NoticeTransport;
