// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end engine testing.
//!
//! `TestHarness` assembles a complete engine over a temp SQLite database, a
//! mock transport and an in-memory log port. Provides `handle()` to drive
//! lifecycle events through the state machine in tests.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use deskroute_config::model::{DeskrouteConfig, StorageConfig};
use deskroute_core::types::{Consultation, Manager};
use deskroute_core::{
    ConsultationStore, DeskrouteError, EventKind, EventOutcome, LifecycleEvent, StorageAdapter,
};
use deskroute_engine::{ConsultationStateMachine, EnginePorts};
use deskroute_storage::SqliteStorage;

use crate::flaky_store::FlakyStore;
use crate::memory_log::MemoryLogPort;
use crate::mock_transport::MockTransport;

/// Builder for creating test environments with seeded data.
pub struct TestHarnessBuilder {
    config: DeskrouteConfig,
    managers: Vec<Manager>,
    topics: Vec<(String, Option<String>)>,
    consultations: Vec<Consultation>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            config: DeskrouteConfig::default(),
            managers: Vec::new(),
            topics: Vec::new(),
            consultations: Vec::new(),
        }
    }

    /// Replace the engine configuration. The storage section is always
    /// pointed at the temp database.
    pub fn with_config(mut self, config: DeskrouteConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_manager(mut self, manager: Manager) -> Self {
        self.managers.push(manager);
        self
    }

    /// Seed a topic so consultations selecting it pick up its language.
    pub fn with_topic(mut self, topic_key: &str, language: Option<&str>) -> Self {
        self.topics
            .push((topic_key.to_string(), language.map(str::to_string)));
        self
    }

    pub fn with_consultation(mut self, consultation: Consultation) -> Self {
        self.consultations.push(consultation);
        self
    }

    /// Build the test harness, creating and seeding the temp database.
    pub async fn build(self) -> Result<TestHarness, DeskrouteError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| DeskrouteError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        let mut config = self.config;
        config.storage = StorageConfig {
            database_path: db_path.to_string_lossy().into_owned(),
            wal_mode: true,
        };

        let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
        storage.initialize().await?;

        for manager in &self.managers {
            storage.upsert_manager(manager).await?;
        }
        for (key, language) in &self.topics {
            storage
                .upsert_topic(key, None, language.as_deref())
                .await?;
        }
        for consultation in &self.consultations {
            storage.insert_consultation(consultation).await?;
        }

        let store = Arc::new(FlakyStore::new(storage.clone()));
        let transport = Arc::new(MockTransport::new());
        let logs = Arc::new(MemoryLogPort::new());
        let engine = ConsultationStateMachine::new(
            EnginePorts::from_store(store.clone(), transport.clone(), logs.clone()),
            config.clone(),
        );

        Ok(TestHarness {
            engine,
            storage,
            store,
            transport,
            logs,
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with a mock transport and temp storage.
pub struct TestHarness {
    /// The engine under test, wired to `store`.
    pub engine: ConsultationStateMachine,
    /// SQLite storage (temp DB, cleaned up on drop).
    pub storage: Arc<SqliteStorage>,
    /// The store the engine reads through; can inject read failures.
    pub store: Arc<FlakyStore>,
    pub transport: Arc<MockTransport>,
    pub logs: Arc<MemoryLogPort>,
    pub config: DeskrouteConfig,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Drive one event through the state machine.
    pub async fn handle(
        &self,
        cons_id: &str,
        kind: EventKind,
        at: DateTime<Utc>,
    ) -> Result<EventOutcome, DeskrouteError> {
        let event = LifecycleEvent {
            cons_id: cons_id.to_string(),
            kind,
            received_at: at,
        };
        self.engine.handle_lifecycle_event(&event).await
    }

    /// Current stored state of a consultation.
    pub async fn consultation(&self, cons_id: &str) -> Result<Consultation, DeskrouteError> {
        self.storage
            .get_consultation(cons_id)
            .await?
            .ok_or_else(|| DeskrouteError::consultation_not_found(cons_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{at, consultation, manager};
    use deskroute_core::types::ConsultationStatus;

    #[tokio::test]
    async fn harness_seeds_and_handles_events() {
        let harness = TestHarness::builder()
            .with_manager(manager("m1", 5))
            .with_topic("q-accounting", Some("uz"))
            .with_consultation(consultation("c1", at(9, 0)))
            .build()
            .await
            .unwrap();

        let stored = harness.consultation("c1").await.unwrap();
        assert_eq!(stored.status, ConsultationStatus::Created);
        assert_eq!(stored.topic_language.as_deref(), Some("uz"));

        let outcome = harness
            .handle("c1", EventKind::Created, at(9, 1))
            .await
            .unwrap();
        assert!(!outcome.was_ignored());
        assert_eq!(
            harness.consultation("c1").await.unwrap().assigned_manager.as_deref(),
            Some("m1")
        );
    }

    #[tokio::test]
    async fn missing_consultation_is_not_found() {
        let harness = TestHarness::builder().build().await.unwrap();
        let err = harness.consultation("nope").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
