// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Deskroute consultation engine.
//!
//! This crate provides the error type, the domain types, the inbound event
//! model and the port traits every other crate builds on. Persistence, the
//! chat-platform transport and logging are all reached through the traits
//! defined here.

pub mod error;
pub mod event;
pub mod logging;
pub mod traits;
pub mod types;

pub use error::DeskrouteError;
pub use event::{EventKind, EventOutcome, LifecycleEvent, SideEffect};
pub use logging::TracingLogPort;
pub use types::{
    AdapterType, AvgResolution, Capabilities, CapabilityFilter, Consultation, ConsultationStatus,
    ConsultationUpdate, HealthStatus, LoadInfo, Manager, MessageDirection, NoticeButton,
    NoticeKind, OutboundNotice, QueueInfo, Rating, WaitEstimate, WorkingHours,
};

pub use traits::{
    ConsultationStore, LogLevel, LogPort, LogRecord, LogSink, ManagerDirectory, NoticeTransport,
    NotificationLedger, PluginAdapter, ResolutionStats, StorageAdapter,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deskroute_error_variants() {
        let _config = DeskrouteError::Config("test".into());
        let _storage = DeskrouteError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _transport = DeskrouteError::Transport {
            message: "test".into(),
            source: None,
        };
        let _invalid = DeskrouteError::InvalidEvent("test".into());
        let _health = DeskrouteError::HealthCheckFailed {
            name: "test".into(),
            source: Box::new(std::io::Error::other("test")),
        };
        let _internal = DeskrouteError::Internal("test".into());

        let missing = DeskrouteError::consultation_not_found("42");
        assert!(missing.is_not_found());
        assert_eq!(missing.to_string(), "consultation not found: 42");
    }

    #[test]
    fn adapter_type_round_trips_through_display() {
        use std::str::FromStr;

        for variant in [
            AdapterType::Storage,
            AdapterType::Transport,
            AdapterType::Observability,
        ] {
            let parsed = AdapterType::from_str(&variant.to_string()).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn health_status_variants() {
        let healthy = HealthStatus::Healthy;
        assert_ne!(HealthStatus::Degraded("slow".into()), healthy);
        assert_ne!(HealthStatus::Unhealthy("down".into()), healthy);
    }

    #[test]
    fn all_ports_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_storage_adapter<T: StorageAdapter>() {}
        fn _assert_transport<T: NoticeTransport>() {}
        fn _assert_directory<T: ManagerDirectory>() {}
        fn _assert_store<T: ConsultationStore>() {}
        fn _assert_ledger<T: NotificationLedger>() {}
        fn _assert_stats<T: ResolutionStats>() {}
        fn _assert_log_port<T: LogPort>() {}
        _assert_log_port::<TracingLogPort>();
    }
}
