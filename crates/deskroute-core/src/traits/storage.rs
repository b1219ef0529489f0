// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store ports: manager directory, consultation store, notification ledger
//! and handling-time statistics.
//!
//! The engine never caches anything read through these ports; load and queue
//! figures are recomputed on every call.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::DeskrouteError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Consultation, ConsultationUpdate, Manager, Rating};

/// Lifecycle of a persistence backend.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Opens the backend and applies migrations.
    async fn initialize(&self) -> Result<(), DeskrouteError>;

    /// Flushes pending writes and releases the connection.
    async fn close(&self) -> Result<(), DeskrouteError>;
}

/// Read-only manager directory.
#[async_trait]
pub trait ManagerDirectory: Send + Sync {
    /// All managers, ordered by key.
    async fn list_managers(&self) -> Result<Vec<Manager>, DeskrouteError>;

    async fn get_manager(&self, key: &str) -> Result<Option<Manager>, DeskrouteError>;

    /// Resolve a chat-platform user id to a manager.
    async fn find_manager_by_external_id(
        &self,
        external_user_id: &str,
    ) -> Result<Option<Manager>, DeskrouteError>;
}

/// Consultation reads and the narrow set of writes the engine performs.
#[async_trait]
pub trait ConsultationStore: Send + Sync {
    async fn get_consultation(&self, cons_id: &str)
    -> Result<Option<Consultation>, DeskrouteError>;

    /// Non-terminal consultations assigned to the manager, oldest first.
    async fn open_consultations_for_manager(
        &self,
        manager_key: &str,
    ) -> Result<Vec<Consultation>, DeskrouteError>;

    /// Number of non-terminal consultations assigned to the manager.
    async fn count_open_for_manager(&self, manager_key: &str) -> Result<u32, DeskrouteError>;

    /// Apply a status/assignee write. Returns `false` when the stored row is
    /// already terminal (or missing) and nothing was written.
    async fn update_consultation(&self, update: &ConsultationUpdate)
    -> Result<bool, DeskrouteError>;

    /// Set `updated_at` without touching anything else.
    async fn touch_consultation(
        &self,
        cons_id: &str,
        at: DateTime<Utc>,
    ) -> Result<(), DeskrouteError>;

    /// Insert a rating unless one exists for the consultation. Returns whether
    /// a row was written.
    async fn record_rating(&self, rating: &Rating) -> Result<bool, DeskrouteError>;
}

/// Durable set keyed by `(cons_id, notice_kind)`.
#[async_trait]
pub trait NotificationLedger: Send + Sync {
    /// Insert the key if absent, atomically. Returns `true` when it was absent.
    async fn insert_if_absent(
        &self,
        cons_id: &str,
        notice_kind: &str,
    ) -> Result<bool, DeskrouteError>;
}

/// Average handling time aggregation.
#[async_trait]
pub trait ResolutionStats: Send + Sync {
    /// Mean minutes between start and end of the manager's completed
    /// consultations that ended at or after `since`. `None` without samples.
    async fn avg_resolution_minutes(
        &self,
        manager_key: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<f64>, DeskrouteError>;
}
