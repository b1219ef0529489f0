// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Least-loaded manager selection and load reporting.
//!
//! Reads favor availability: one manager's failed lookup is logged to the
//! system sink and that manager is left out, while the rest are still
//! reported or considered. Only a failure to list the managers at all is
//! returned to the caller.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;
use serde::Serialize;
use tracing::debug;

use deskroute_config::model::RoutingConfig;
use deskroute_core::types::{AvgResolution, CapabilityFilter, Consultation, LoadInfo, Manager};
use deskroute_core::{
    ConsultationStore, DeskrouteError, LogLevel, LogPort, LogRecord, ManagerDirectory,
    ResolutionStats,
};

use crate::availability::AvailabilityFilter;
use crate::capability::CapabilityMatcher;
use crate::estimator::format_wait_text;
use crate::load::LoadCalculator;

/// One row of the available-managers report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailableManager {
    #[serde(flatten)]
    pub load: LoadInfo,
    pub avg_resolution_minutes: Option<f64>,
    /// `round(avg * queue_count)`; `None` without a handling-time sample or
    /// with an empty queue.
    pub estimated_wait_minutes: Option<u64>,
    pub wait_text: Option<String>,
}

/// Picks managers for new consultations and answers load queries.
pub struct ManagerSelector {
    directory: Arc<dyn ManagerDirectory>,
    consultations: Arc<dyn ConsultationStore>,
    stats: Arc<dyn ResolutionStats>,
    availability: AvailabilityFilter,
    config: RoutingConfig,
    log: Arc<dyn LogPort>,
}

impl ManagerSelector {
    pub fn new(
        directory: Arc<dyn ManagerDirectory>,
        consultations: Arc<dyn ConsultationStore>,
        stats: Arc<dyn ResolutionStats>,
        config: RoutingConfig,
        log: Arc<dyn LogPort>,
    ) -> Self {
        Self {
            availability: AvailabilityFilter::new(config.utc_offset_hours),
            directory,
            consultations,
            stats,
            config,
            log,
        }
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Managers matching `filter`, and inside their working window at `at`
    /// when `enforce_working_hours` is set.
    pub async fn get_available_managers(
        &self,
        at: DateTime<Utc>,
        filter: &CapabilityFilter,
        enforce_working_hours: bool,
    ) -> Result<Vec<Manager>, DeskrouteError> {
        let managers = self.directory.list_managers().await?;
        Ok(managers
            .into_iter()
            .filter(|m| CapabilityMatcher::matches(m, filter))
            .filter(|m| !enforce_working_hours || self.availability.is_available(m, at))
            .collect())
    }

    /// Current load of one manager. `Ok(None)` for an unknown key.
    pub async fn get_manager_current_load(
        &self,
        manager_key: &str,
    ) -> Result<Option<LoadInfo>, DeskrouteError> {
        self.load_at(manager_key, Utc::now()).await
    }

    pub async fn load_at(
        &self,
        manager_key: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<LoadInfo>, DeskrouteError> {
        let Some(manager) = self.directory.get_manager(manager_key).await? else {
            return Ok(None);
        };
        self.load_of(&manager, at).await.map(Some)
    }

    /// Load of every manager. Managers whose lookup fails are skipped.
    pub async fn get_all_managers_load(
        &self,
        at: DateTime<Utc>,
    ) -> Result<Vec<LoadInfo>, DeskrouteError> {
        let managers = self.directory.list_managers().await?;
        Ok(self
            .loads_for(&managers, at)
            .await
            .into_iter()
            .map(|(_, load)| load)
            .collect())
    }

    /// Lowest `load_percent` wins, then lowest `queue_count`, then key.
    ///
    /// Candidates whose load cannot be read are not considered. `None` when
    /// nothing is left; the caller decides what "no manager" means.
    pub async fn pick_least_loaded(&self, candidates: &[Manager]) -> Option<Manager> {
        self.pick_at(candidates, Utc::now(), false)
            .await
            .map(|(manager, _)| manager)
    }

    /// Pick a manager for `consultation` using its capability tags and the
    /// routing config.
    pub async fn select_for(
        &self,
        consultation: &Consultation,
        at: DateTime<Utc>,
    ) -> Result<Option<(Manager, LoadInfo)>, DeskrouteError> {
        let candidates = self
            .get_available_managers(
                at,
                &consultation.capability_filter(),
                self.config.enforce_working_hours,
            )
            .await?;
        let picked = self
            .pick_at(&candidates, at, self.config.exclude_full_managers)
            .await;
        debug!(
            cons_id = %consultation.cons_id,
            candidates = candidates.len(),
            picked = picked.as_ref().map(|(m, _)| m.key.as_str()).unwrap_or("-"),
            "manager selection"
        );
        Ok(picked)
    }

    /// Average handling time over the trailing `days`.
    pub async fn get_manager_avg_resolution(
        &self,
        manager_key: &str,
        days: u32,
    ) -> Result<AvgResolution, DeskrouteError> {
        self.avg_resolution_as_of(manager_key, days, Utc::now()).await
    }

    pub async fn avg_resolution_as_of(
        &self,
        manager_key: &str,
        days: u32,
        now: DateTime<Utc>,
    ) -> Result<AvgResolution, DeskrouteError> {
        let since = now - Duration::days(i64::from(days));
        let avg_resolution_minutes = self.stats.avg_resolution_minutes(manager_key, since).await?;
        Ok(AvgResolution {
            avg_resolution_minutes,
        })
    }

    /// Capability-matched managers regardless of working hours, busiest first.
    pub async fn available_managers_report(
        &self,
        at: DateTime<Utc>,
        filter: &CapabilityFilter,
    ) -> Result<Vec<AvailableManager>, DeskrouteError> {
        let managers = self.get_available_managers(at, filter, false).await?;
        let loads = self.loads_for(&managers, at).await;

        let mut rows = join_all(loads.into_iter().map(|(manager, load)| async move {
            let avg = match self
                .avg_resolution_as_of(&manager.key, self.config.avg_resolution_window_days, at)
                .await
            {
                Ok(avg) => avg.avg_resolution_minutes,
                Err(e) => {
                    self.log.record(
                        LogRecord::system(LogLevel::Warn, "average resolution unavailable")
                            .field("manager_key", &manager.key)
                            .field("error", e),
                    );
                    None
                }
            };
            let estimated_wait_minutes = avg
                .filter(|a| *a > 0.0 && load.queue_count > 0)
                .map(|a| (a * f64::from(load.queue_count)).round() as u64);
            AvailableManager {
                load,
                avg_resolution_minutes: avg,
                estimated_wait_minutes,
                wait_text: estimated_wait_minutes.map(format_wait_text),
            }
        }))
        .await;

        rows.sort_by(|a, b| {
            b.load
                .load_percent
                .cmp(&a.load.load_percent)
                .then_with(|| a.load.manager_key.cmp(&b.load.manager_key))
        });
        Ok(rows)
    }

    async fn pick_at(
        &self,
        candidates: &[Manager],
        at: DateTime<Utc>,
        exclude_full: bool,
    ) -> Option<(Manager, LoadInfo)> {
        let loads = self.loads_for(candidates, at).await;
        let best = least_loaded(
            loads
                .iter()
                .map(|(_, load)| load)
                .filter(|load| !exclude_full || load.available_slots > 0),
        )?;
        let manager = loads
            .iter()
            .find(|(m, _)| m.key == best.manager_key)
            .map(|(m, _)| (*m).clone())?;
        Some((manager, best.clone()))
    }

    async fn load_of(
        &self,
        manager: &Manager,
        at: DateTime<Utc>,
    ) -> Result<LoadInfo, DeskrouteError> {
        let count = self
            .consultations
            .count_open_for_manager(&manager.key)
            .await?;
        Ok(LoadCalculator::compute(
            manager,
            count,
            self.availability.is_available(manager, at),
        ))
    }

    /// Loads computed independently; failures are logged and dropped.
    async fn loads_for<'m>(
        &self,
        managers: &'m [Manager],
        at: DateTime<Utc>,
    ) -> Vec<(&'m Manager, LoadInfo)> {
        let results = join_all(
            managers
                .iter()
                .map(|m| async move { (m, self.load_of(m, at).await) }),
        )
        .await;

        results
            .into_iter()
            .filter_map(|(manager, result)| match result {
                Ok(load) => Some((manager, load)),
                Err(e) => {
                    self.log.record(
                        LogRecord::system(LogLevel::Warn, "manager load unavailable")
                            .field("manager_key", &manager.key)
                            .field("error", e),
                    );
                    None
                }
            })
            .collect()
    }
}

/// Deterministic least-loaded choice over computed loads.
pub fn least_loaded<'a>(loads: impl IntoIterator<Item = &'a LoadInfo>) -> Option<&'a LoadInfo> {
    loads.into_iter().min_by(|a, b| {
        a.load_percent
            .cmp(&b.load_percent)
            .then(a.queue_count.cmp(&b.queue_count))
            .then_with(|| a.manager_key.cmp(&b.manager_key))
    })
}
