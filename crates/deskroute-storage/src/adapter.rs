// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the store ports.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::OnceCell;
use tracing::debug;

use deskroute_config::model::StorageConfig;
use deskroute_core::types::{Consultation, ConsultationUpdate, Manager, Rating};
use deskroute_core::{
    AdapterType, ConsultationStore, DeskrouteError, HealthStatus, ManagerDirectory,
    NotificationLedger, PluginAdapter, ResolutionStats, StorageAdapter,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed store.
///
/// Implements every store port the engine consumes. The database is opened
/// on [`StorageAdapter::initialize`]; every other call fails until then.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// The connection is not opened until [`StorageAdapter::initialize`].
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns the underlying Database, or an error if not initialized.
    pub fn db(&self) -> Result<&Database, DeskrouteError> {
        self.db.get().ok_or_else(|| DeskrouteError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    // --- Administration and seeding ---

    pub async fn upsert_manager(&self, manager: &Manager) -> Result<(), DeskrouteError> {
        queries::managers::upsert_manager(self.db()?, manager).await
    }

    pub async fn upsert_topic(
        &self,
        topic_key: &str,
        title: Option<&str>,
        language: Option<&str>,
    ) -> Result<(), DeskrouteError> {
        queries::topics::upsert_topic(self.db()?, topic_key, title, language).await
    }

    pub async fn insert_consultation(&self, c: &Consultation) -> Result<(), DeskrouteError> {
        queries::consultations::insert_consultation(self.db()?, c).await
    }

    pub async fn get_rating(&self, cons_id: &str) -> Result<Option<Rating>, DeskrouteError> {
        queries::ratings::get_rating(self.db()?, cons_id).await
    }

    pub async fn ledger_entries(&self, cons_id: &str) -> Result<Vec<String>, DeskrouteError> {
        queries::ledger::kinds_for(self.db()?, cons_id).await
    }

    async fn checkpoint(&self, db: &Database) -> Result<(), DeskrouteError> {
        if !self.config.wal_mode {
            return Ok(());
        }
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                // wal_checkpoint returns a status row, so query rather than execute.
                conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, DeskrouteError> {
        let Ok(db) = self.db() else {
            return Ok(HealthStatus::Unhealthy("not initialized".to_string()));
        };
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.query_row("SELECT 1", [], |_| Ok(()))?;
                Ok(())
            })
            .await
            .map_err(|e| DeskrouteError::HealthCheckFailed {
                name: "sqlite".to_string(),
                source: Box::new(e),
            })?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), DeskrouteError> {
        if let Some(db) = self.db.get() {
            self.checkpoint(db).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), DeskrouteError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| DeskrouteError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), DeskrouteError> {
        let db = self.db()?;
        self.checkpoint(db).await
    }
}

#[async_trait]
impl ManagerDirectory for SqliteStorage {
    async fn list_managers(&self) -> Result<Vec<Manager>, DeskrouteError> {
        queries::managers::list_managers(self.db()?).await
    }

    async fn get_manager(&self, key: &str) -> Result<Option<Manager>, DeskrouteError> {
        queries::managers::get_manager(self.db()?, key).await
    }

    async fn find_manager_by_external_id(
        &self,
        external_user_id: &str,
    ) -> Result<Option<Manager>, DeskrouteError> {
        queries::managers::find_by_external_id(self.db()?, external_user_id).await
    }
}

#[async_trait]
impl ConsultationStore for SqliteStorage {
    async fn get_consultation(
        &self,
        cons_id: &str,
    ) -> Result<Option<Consultation>, DeskrouteError> {
        queries::consultations::get_consultation(self.db()?, cons_id).await
    }

    async fn open_consultations_for_manager(
        &self,
        manager_key: &str,
    ) -> Result<Vec<Consultation>, DeskrouteError> {
        queries::consultations::open_for_manager(self.db()?, manager_key).await
    }

    async fn count_open_for_manager(&self, manager_key: &str) -> Result<u32, DeskrouteError> {
        queries::consultations::count_open_for_manager(self.db()?, manager_key).await
    }

    async fn update_consultation(
        &self,
        update: &ConsultationUpdate,
    ) -> Result<bool, DeskrouteError> {
        queries::consultations::update_consultation(self.db()?, update).await
    }

    async fn touch_consultation(
        &self,
        cons_id: &str,
        at: DateTime<Utc>,
    ) -> Result<(), DeskrouteError> {
        queries::consultations::touch_consultation(self.db()?, cons_id, at).await
    }

    async fn record_rating(&self, rating: &Rating) -> Result<bool, DeskrouteError> {
        queries::ratings::record_rating(self.db()?, rating).await
    }
}

#[async_trait]
impl NotificationLedger for SqliteStorage {
    async fn insert_if_absent(
        &self,
        cons_id: &str,
        notice_kind: &str,
    ) -> Result<bool, DeskrouteError> {
        queries::ledger::insert_if_absent(self.db()?, cons_id, notice_kind).await
    }
}

#[async_trait]
impl ResolutionStats for SqliteStorage {
    async fn avg_resolution_minutes(
        &self,
        manager_key: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<f64>, DeskrouteError> {
        queries::consultations::avg_resolution_minutes(self.db()?, manager_key, since).await
    }
}
