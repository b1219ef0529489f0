// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `deskroute event` command implementation.
//!
//! Decodes one JSON lifecycle event and runs it through the full engine
//! against the configured store. Store writes and ledger entries are real;
//! notices go to [`DryRunTransport`], which logs them instead of delivering.

use std::io::Read;
use std::sync::Arc;

use async_trait::async_trait;

use deskroute_config::model::DeskrouteConfig;
use deskroute_core::types::{AdapterType, HealthStatus, OutboundNotice};
use deskroute_core::{
    DeskrouteError, EventOutcome, LifecycleEvent, LogLevel, LogPort, LogRecord, NoticeTransport,
    PluginAdapter, StorageAdapter, TracingLogPort,
};
use deskroute_engine::{ConsultationStateMachine, EnginePorts};
use deskroute_storage::SqliteStorage;

use crate::report::{open_storage, print_json};

/// Notice transport that records notices on the integration sink only.
pub struct DryRunTransport {
    log: Arc<dyn LogPort>,
}

impl DryRunTransport {
    pub fn new(log: Arc<dyn LogPort>) -> Self {
        Self { log }
    }
}

#[async_trait]
impl PluginAdapter for DryRunTransport {
    fn name(&self) -> &str {
        "dry-run"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Transport
    }

    async fn health_check(&self) -> Result<HealthStatus, DeskrouteError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), DeskrouteError> {
        Ok(())
    }
}

#[async_trait]
impl NoticeTransport for DryRunTransport {
    async fn send_notice(&self, notice: &OutboundNotice) -> Result<(), DeskrouteError> {
        self.log.record(
            LogRecord::integration(LogLevel::Info, "dry run: notice not delivered")
                .field("cons_id", &notice.cons_id)
                .field("kind", notice.kind)
                .field("channel", notice.channel.as_deref().unwrap_or("-"))
                .field("labels", notice.labels.join(","))
                .field("text", &notice.text),
        );
        Ok(())
    }
}

/// Read an event from a file path, or from stdin for `-`.
pub fn read_event(source: &str) -> Result<LifecycleEvent, DeskrouteError> {
    let raw = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| DeskrouteError::InvalidEvent(format!("failed to read stdin: {e}")))?;
        buf
    } else {
        std::fs::read_to_string(source)
            .map_err(|e| DeskrouteError::InvalidEvent(format!("failed to read {source}: {e}")))?
    };
    LifecycleEvent::from_json(&raw)
}

pub async fn replay_event(
    storage: Arc<SqliteStorage>,
    config: &DeskrouteConfig,
    log: Arc<dyn LogPort>,
    event: &LifecycleEvent,
) -> Result<EventOutcome, DeskrouteError> {
    let transport = Arc::new(DryRunTransport::new(log.clone()));
    let ports = EnginePorts::from_store(storage, transport, log);
    let engine = ConsultationStateMachine::new(ports, config.clone());
    engine.handle_lifecycle_event(event).await
}

pub async fn run_event(config: &DeskrouteConfig, source: &str) -> Result<(), DeskrouteError> {
    let event = read_event(source)?;
    let storage = open_storage(config).await?;
    let outcome = replay_event(
        storage.clone(),
        config,
        Arc::new(TracingLogPort::new()),
        &event,
    )
    .await?;
    print_json(&outcome)?;
    storage.close().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskroute_config::model::StorageConfig;
    use deskroute_core::LogSink;
    use deskroute_core::types::NoticeKind;
    use deskroute_test_utils::MemoryLogPort;
    use deskroute_test_utils::fixtures::{consultation, manager};

    #[tokio::test]
    async fn replay_logs_notices_instead_of_sending() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = DeskrouteConfig::default();
        config.storage = StorageConfig {
            database_path: dir.path().join("replay.db").to_string_lossy().into_owned(),
            wal_mode: true,
        };
        let storage = open_storage(&config).await.unwrap();
        storage.upsert_manager(&manager("m1", 3)).await.unwrap();
        let created = chrono::Utc::now();
        storage
            .insert_consultation(&consultation("77", created))
            .await
            .unwrap();

        let path = dir.path().join("event.json");
        std::fs::write(&path, r#"{"kind":"created","cons_id":"77"}"#).unwrap();
        let event = read_event(path.to_str().unwrap()).unwrap();

        let logs = Arc::new(MemoryLogPort::new());
        let outcome = replay_event(storage.clone(), &config, logs.clone(), &event)
            .await
            .unwrap();

        assert!(outcome.sent(NoticeKind::Accepted));
        let dry: Vec<_> = logs
            .for_sink(LogSink::Integration)
            .into_iter()
            .filter(|r| r.message == "dry run: notice not delivered")
            .collect();
        assert_eq!(dry.len(), 1);
        assert_eq!(dry[0].field_value("cons_id"), Some("77"));
        assert_eq!(dry[0].field_value("kind"), Some("accepted"));
    }

    #[test]
    fn unreadable_or_malformed_event_is_invalid() {
        let err = read_event("/nonexistent/event.json").unwrap_err();
        assert!(matches!(err, DeskrouteError::InvalidEvent(_)));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = read_event(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, DeskrouteError::InvalidEvent(_)));
    }
}
