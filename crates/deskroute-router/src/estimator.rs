// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Queue position and wait estimates.
//!
//! The estimator answers for any consultation it is asked about. Whether a
//! queue position may be shown at all (a classified topic, a non-support
//! type) is decided by the caller before it asks.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use deskroute_config::model::RoutingConfig;
use deskroute_core::types::{QueueInfo, WaitEstimate};
use deskroute_core::{ConsultationStore, DeskrouteError, ResolutionStats};

/// Computes queue positions from the live open set of a manager.
pub struct QueueEstimator {
    consultations: Arc<dyn ConsultationStore>,
    stats: Arc<dyn ResolutionStats>,
    config: RoutingConfig,
}

impl QueueEstimator {
    pub fn new(
        consultations: Arc<dyn ConsultationStore>,
        stats: Arc<dyn ResolutionStats>,
        config: RoutingConfig,
    ) -> Self {
        Self {
            consultations,
            stats,
            config,
        }
    }

    /// Queue position and wait for `cons_id` in the manager's backlog.
    ///
    /// With `cons_id`, the position is its 1-based rank among the manager's
    /// open consultations, oldest first; a consultation outside that set
    /// (terminal, unassigned, someone else's) gets the all-`None` estimate.
    /// Without it, the position a new request would take: open count + 1.
    pub async fn calculate_wait_time(
        &self,
        manager_key: &str,
        average_duration_minutes: f64,
        cons_id: Option<&str>,
    ) -> Result<WaitEstimate, DeskrouteError> {
        let position = match cons_id {
            Some(cons_id) => {
                let open = self
                    .consultations
                    .open_consultations_for_manager(manager_key)
                    .await?;
                match open.iter().position(|c| c.cons_id == cons_id) {
                    Some(index) => index as u32 + 1,
                    None => return Ok(WaitEstimate::unknown()),
                }
            }
            None => {
                self.consultations
                    .count_open_for_manager(manager_key)
                    .await?
                    + 1
            }
        };
        Ok(estimate(position, average_duration_minutes))
    }

    /// Queue information for an existing consultation.
    ///
    /// Fails with `NotFound` for an unknown consultation. An unassigned one
    /// gets an empty answer. Without a handling-time sample the position is
    /// still reported and the wait is left empty.
    pub async fn consultation_queue_info(
        &self,
        cons_id: &str,
    ) -> Result<QueueInfo, DeskrouteError> {
        self.queue_info_as_of(cons_id, Utc::now()).await
    }

    pub async fn queue_info_as_of(
        &self,
        cons_id: &str,
        now: DateTime<Utc>,
    ) -> Result<QueueInfo, DeskrouteError> {
        let consultation = self
            .consultations
            .get_consultation(cons_id)
            .await?
            .ok_or_else(|| DeskrouteError::consultation_not_found(cons_id))?;
        let Some(manager_key) = consultation.assigned_manager else {
            return Ok(QueueInfo::default());
        };

        let since = now - Duration::days(i64::from(self.config.avg_resolution_window_days));
        let avg = self.stats.avg_resolution_minutes(&manager_key, since).await?;

        let mut wait = self
            .calculate_wait_time(&manager_key, avg.unwrap_or(0.0), Some(cons_id))
            .await?;
        if avg.is_none() {
            wait.estimated_wait_minutes = None;
            wait.estimated_wait_hours = None;
        }

        Ok(QueueInfo {
            manager_key: Some(manager_key),
            wait,
            avg_resolution_minutes: avg,
        })
    }
}

/// Wait for a 1-based `position`: `round(avg * (position - 1))` minutes.
///
/// Hours are whole hours by integer division and only ever displayed.
pub fn estimate(position: u32, average_duration_minutes: f64) -> WaitEstimate {
    let ahead = f64::from(position.saturating_sub(1));
    let minutes = (average_duration_minutes.max(0.0) * ahead).round() as u64;
    WaitEstimate {
        queue_position: Some(position),
        estimated_wait_minutes: Some(minutes),
        estimated_wait_hours: Some(minutes / 60),
    }
}

/// `~N min` under an hour, `~X.Y h` from an hour on.
pub fn format_wait_text(minutes: u64) -> String {
    if minutes < 60 {
        format!("~{minutes} min")
    } else {
        format!("~{:.1} h", minutes as f64 / 60.0)
    }
}
