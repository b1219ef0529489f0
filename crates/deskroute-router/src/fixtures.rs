// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory store and builders shared by this crate's unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use deskroute_core::types::{
    Capabilities, Consultation, ConsultationStatus, ConsultationUpdate, Manager, Rating,
};
use deskroute_core::{
    ConsultationStore, DeskrouteError, LogPort, LogRecord, ManagerDirectory, ResolutionStats,
};

pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, hour, minute, 0).unwrap()
}

pub fn manager(key: &str, limit: u32) -> Manager {
    Manager {
        key: key.to_string(),
        external_user_id: Some(format!("ext-{key}")),
        name: format!("Manager {key}"),
        capacity_limit: limit,
        working_hours: None,
        capabilities: Capabilities::default(),
    }
}

pub fn consultation(cons_id: &str, manager: &str, created: DateTime<Utc>) -> Consultation {
    Consultation {
        cons_id: cons_id.to_string(),
        status: ConsultationStatus::Open,
        assigned_manager: Some(manager.to_string()),
        selected_question: Some("q1".to_string()),
        topic_language: None,
        language: None,
        consultation_type: None,
        source: None,
        software: None,
        category: None,
        created_at: created,
        updated_at: created,
        started_at: None,
        ended_at: None,
    }
}

#[derive(Default)]
pub struct FakeStore {
    managers: Mutex<Vec<Manager>>,
    consultations: Mutex<Vec<Consultation>>,
    averages: Mutex<HashMap<String, f64>>,
    failing: Mutex<HashSet<String>>,
}

impl FakeStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_manager(&self, manager: Manager) {
        self.managers.lock().unwrap().push(manager);
    }

    pub fn add_consultation(&self, consultation: Consultation) {
        self.consultations.lock().unwrap().push(consultation);
    }

    /// Give `manager_key` `count` open consultations created an hour apart.
    pub fn fill(&self, manager_key: &str, count: u32) {
        for i in 0..count {
            self.add_consultation(consultation(
                &format!("{manager_key}-c{i}"),
                manager_key,
                at(i % 24, 0),
            ));
        }
    }

    pub fn set_average(&self, manager_key: &str, minutes: f64) {
        self.averages
            .lock()
            .unwrap()
            .insert(manager_key.to_string(), minutes);
    }

    /// Make every per-manager lookup for `manager_key` fail.
    pub fn fail_for(&self, manager_key: &str) {
        self.failing.lock().unwrap().insert(manager_key.to_string());
    }

    fn check(&self, manager_key: &str) -> Result<(), DeskrouteError> {
        if self.failing.lock().unwrap().contains(manager_key) {
            return Err(DeskrouteError::Storage {
                source: format!("injected failure for {manager_key}").into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ManagerDirectory for FakeStore {
    async fn list_managers(&self) -> Result<Vec<Manager>, DeskrouteError> {
        let mut managers = self.managers.lock().unwrap().clone();
        managers.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(managers)
    }

    async fn get_manager(&self, key: &str) -> Result<Option<Manager>, DeskrouteError> {
        Ok(self
            .managers
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.key == key)
            .cloned())
    }

    async fn find_manager_by_external_id(
        &self,
        external_user_id: &str,
    ) -> Result<Option<Manager>, DeskrouteError> {
        Ok(self
            .managers
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.external_user_id.as_deref() == Some(external_user_id))
            .cloned())
    }
}

#[async_trait]
impl ConsultationStore for FakeStore {
    async fn get_consultation(
        &self,
        cons_id: &str,
    ) -> Result<Option<Consultation>, DeskrouteError> {
        Ok(self
            .consultations
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.cons_id == cons_id)
            .cloned())
    }

    async fn open_consultations_for_manager(
        &self,
        manager_key: &str,
    ) -> Result<Vec<Consultation>, DeskrouteError> {
        self.check(manager_key)?;
        let mut open: Vec<Consultation> = self
            .consultations
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.assigned_manager.as_deref() == Some(manager_key))
            .filter(|c| !c.status.is_terminal())
            .cloned()
            .collect();
        open.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.cons_id.cmp(&b.cons_id)));
        Ok(open)
    }

    async fn count_open_for_manager(&self, manager_key: &str) -> Result<u32, DeskrouteError> {
        Ok(self.open_consultations_for_manager(manager_key).await?.len() as u32)
    }

    async fn update_consultation(
        &self,
        _update: &ConsultationUpdate,
    ) -> Result<bool, DeskrouteError> {
        unimplemented!("selection never writes")
    }

    async fn touch_consultation(
        &self,
        _cons_id: &str,
        _at: DateTime<Utc>,
    ) -> Result<(), DeskrouteError> {
        unimplemented!("selection never writes")
    }

    async fn record_rating(&self, _rating: &Rating) -> Result<bool, DeskrouteError> {
        unimplemented!("selection never writes")
    }
}

#[async_trait]
impl ResolutionStats for FakeStore {
    async fn avg_resolution_minutes(
        &self,
        manager_key: &str,
        _since: DateTime<Utc>,
    ) -> Result<Option<f64>, DeskrouteError> {
        self.check(manager_key)?;
        Ok(self.averages.lock().unwrap().get(manager_key).copied())
    }
}

#[derive(Default)]
pub struct CapturedLogs {
    records: Mutex<Vec<LogRecord>>,
}

impl CapturedLogs {
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl LogPort for CapturedLogs {
    fn record(&self, record: LogRecord) {
        self.records.lock().unwrap().push(record);
    }
}
