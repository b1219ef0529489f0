// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store wrapper with switchable failures.
//!
//! `FlakyStore` delegates every port to a real [`SqliteStorage`] and can be
//! told to fail selected reads, status/assignee writes or ledger inserts, so
//! degraded and failing paths can be driven without corrupting the database.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use deskroute_core::types::{Consultation, ConsultationUpdate, Manager, Rating};
use deskroute_core::{
    ConsultationStore, DeskrouteError, ManagerDirectory, NotificationLedger, ResolutionStats,
};
use deskroute_storage::SqliteStorage;

pub struct FlakyStore {
    inner: Arc<SqliteStorage>,
    failing_managers: Mutex<BTreeSet<String>>,
    stats_failing: AtomicBool,
    writes_failing: AtomicBool,
    ledger_failing: AtomicBool,
}

impl FlakyStore {
    pub fn new(inner: Arc<SqliteStorage>) -> Self {
        Self {
            inner,
            failing_managers: Mutex::new(BTreeSet::new()),
            stats_failing: AtomicBool::new(false),
            writes_failing: AtomicBool::new(false),
            ledger_failing: AtomicBool::new(false),
        }
    }

    pub fn inner(&self) -> &Arc<SqliteStorage> {
        &self.inner
    }

    /// Fail open-set reads for `manager_key` from now on.
    pub fn fail_reads_for(&self, manager_key: &str) {
        self.failing_managers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(manager_key.to_string());
    }

    /// Fail every handling-time aggregation.
    pub fn fail_stats(&self, failing: bool) {
        self.stats_failing.store(failing, Ordering::SeqCst);
    }

    /// Fail every status/assignee write. Nothing reaches the database.
    pub fn fail_writes(&self, failing: bool) {
        self.writes_failing.store(failing, Ordering::SeqCst);
    }

    /// Fail every notification ledger insert.
    pub fn fail_ledger(&self, failing: bool) {
        self.ledger_failing.store(failing, Ordering::SeqCst);
    }

    pub fn heal(&self) {
        self.failing_managers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.fail_stats(false);
        self.fail_writes(false);
        self.fail_ledger(false);
    }

    fn check_manager(&self, manager_key: &str) -> Result<(), DeskrouteError> {
        let failing = self
            .failing_managers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(manager_key);
        if failing {
            return Err(injected(manager_key));
        }
        Ok(())
    }
}

fn injected(what: &str) -> DeskrouteError {
    DeskrouteError::Storage {
        source: format!("injected failure for {what}").into(),
    }
}

#[async_trait]
impl ManagerDirectory for FlakyStore {
    async fn list_managers(&self) -> Result<Vec<Manager>, DeskrouteError> {
        self.inner.list_managers().await
    }

    async fn get_manager(&self, key: &str) -> Result<Option<Manager>, DeskrouteError> {
        self.inner.get_manager(key).await
    }

    async fn find_manager_by_external_id(
        &self,
        external_user_id: &str,
    ) -> Result<Option<Manager>, DeskrouteError> {
        self.inner.find_manager_by_external_id(external_user_id).await
    }
}

#[async_trait]
impl ConsultationStore for FlakyStore {
    async fn get_consultation(
        &self,
        cons_id: &str,
    ) -> Result<Option<Consultation>, DeskrouteError> {
        self.inner.get_consultation(cons_id).await
    }

    async fn open_consultations_for_manager(
        &self,
        manager_key: &str,
    ) -> Result<Vec<Consultation>, DeskrouteError> {
        self.check_manager(manager_key)?;
        self.inner.open_consultations_for_manager(manager_key).await
    }

    async fn count_open_for_manager(&self, manager_key: &str) -> Result<u32, DeskrouteError> {
        self.check_manager(manager_key)?;
        self.inner.count_open_for_manager(manager_key).await
    }

    async fn update_consultation(
        &self,
        update: &ConsultationUpdate,
    ) -> Result<bool, DeskrouteError> {
        if self.writes_failing.load(Ordering::SeqCst) {
            return Err(injected(&update.cons_id));
        }
        self.inner.update_consultation(update).await
    }

    async fn touch_consultation(
        &self,
        cons_id: &str,
        at: DateTime<Utc>,
    ) -> Result<(), DeskrouteError> {
        self.inner.touch_consultation(cons_id, at).await
    }

    async fn record_rating(&self, rating: &Rating) -> Result<bool, DeskrouteError> {
        self.inner.record_rating(rating).await
    }
}

#[async_trait]
impl NotificationLedger for FlakyStore {
    async fn insert_if_absent(
        &self,
        cons_id: &str,
        notice_kind: &str,
    ) -> Result<bool, DeskrouteError> {
        if self.ledger_failing.load(Ordering::SeqCst) {
            return Err(injected("notification ledger"));
        }
        self.inner.insert_if_absent(cons_id, notice_kind).await
    }
}

#[async_trait]
impl ResolutionStats for FlakyStore {
    async fn avg_resolution_minutes(
        &self,
        manager_key: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<f64>, DeskrouteError> {
        if self.stats_failing.load(Ordering::SeqCst) {
            return Err(injected("resolution stats"));
        }
        self.inner.avg_resolution_minutes(manager_key, since).await
    }
}
