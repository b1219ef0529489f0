// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Consultation reads, guarded status/assignee writes and handling-time
//! aggregation.

use chrono::{DateTime, Utc};
use deskroute_core::DeskrouteError;
use deskroute_core::types::ConsultationUpdate;
use rusqlite::{OptionalExtension, params};

use crate::database::Database;
use crate::models::{
    CONSULTATION_SELECT, Consultation, IN_PROGRESS_STATUSES, OPEN_STATUSES, TERMINAL_STATUSES,
    consultation_from_row, from_db_time, to_db_time,
};

/// Insert a new consultation. Used by the intake layer and by tests; the
/// engine itself never creates rows.
pub async fn insert_consultation(db: &Database, c: &Consultation) -> Result<(), DeskrouteError> {
    let c = c.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO consultations (cons_id, status, assigned_manager, selected_question,
                     language, consultation_type, source, software, category,
                     created_at, updated_at, started_at, ended_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    c.cons_id,
                    c.status.as_str(),
                    c.assigned_manager,
                    c.selected_question,
                    c.language,
                    c.consultation_type,
                    c.source,
                    c.software,
                    c.category,
                    to_db_time(c.created_at),
                    to_db_time(c.updated_at),
                    c.started_at.map(to_db_time),
                    c.ended_at.map(to_db_time),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

pub async fn get_consultation(
    db: &Database,
    cons_id: &str,
) -> Result<Option<Consultation>, DeskrouteError> {
    let cons_id = cons_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("{CONSULTATION_SELECT} WHERE c.cons_id = ?1"),
                params![cons_id],
                consultation_from_row,
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Non-terminal consultations assigned to `manager_key`, oldest first.
/// Ties on `created_at` fall back to `cons_id` so ranks are stable.
pub async fn open_for_manager(
    db: &Database,
    manager_key: &str,
) -> Result<Vec<Consultation>, DeskrouteError> {
    let manager_key = manager_key.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "{CONSULTATION_SELECT}
                 WHERE c.assigned_manager = ?1 AND c.status IN {OPEN_STATUSES}
                 ORDER BY c.created_at ASC, c.cons_id ASC"
            ))?;
            let rows = stmt.query_map(params![manager_key], consultation_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

pub async fn count_open_for_manager(
    db: &Database,
    manager_key: &str,
) -> Result<u32, DeskrouteError> {
    let manager_key = manager_key.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!(
                    "SELECT COUNT(*) FROM consultations
                     WHERE assigned_manager = ?1 AND status IN {OPEN_STATUSES}"
                ),
                params![manager_key],
                |row| row.get::<_, u32>(0),
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Apply a status/assignee write unless the stored row is already terminal.
///
/// The terminal guard lives in the `WHERE` clause so a concurrent close can
/// never be overwritten by a late reassignment. With `only_if_unassigned`
/// the row must also still have no assignee. The first move into `open` or
/// `pending` stamps `started_at`; the first terminal status stamps
/// `ended_at`. Returns whether a row changed.
pub async fn update_consultation(
    db: &Database,
    update: &ConsultationUpdate,
) -> Result<bool, DeskrouteError> {
    let u = update.clone();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                &format!(
                    "UPDATE consultations
                     SET status = ?2,
                         assigned_manager = COALESCE(?3, assigned_manager),
                         updated_at = ?4,
                         started_at = CASE WHEN ?2 IN {IN_PROGRESS_STATUSES}
                                           THEN COALESCE(started_at, ?4) ELSE started_at END,
                         ended_at = CASE WHEN ?2 IN {TERMINAL_STATUSES}
                                         THEN COALESCE(ended_at, ?4) ELSE ended_at END
                     WHERE cons_id = ?1
                       AND status NOT IN {TERMINAL_STATUSES}
                       AND (?5 = 0 OR assigned_manager IS NULL)"
                ),
                params![
                    u.cons_id,
                    u.status.as_str(),
                    u.assigned_manager,
                    to_db_time(u.updated_at),
                    u.only_if_unassigned,
                ],
            )?;
            Ok(changed == 1)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Set `updated_at` only.
pub async fn touch_consultation(
    db: &Database,
    cons_id: &str,
    at: DateTime<Utc>,
) -> Result<(), DeskrouteError> {
    let cons_id = cons_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE consultations SET updated_at = ?2 WHERE cons_id = ?1",
                params![cons_id, to_db_time(at)],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Mean minutes from `started_at` to `ended_at` over the manager's resolved
/// or closed consultations that ended at or after `since`.
///
/// Rows with an end before their start are skipped. `None` without samples.
pub async fn avg_resolution_minutes(
    db: &Database,
    manager_key: &str,
    since: DateTime<Utc>,
) -> Result<Option<f64>, DeskrouteError> {
    let manager_key = manager_key.to_string();
    let since = to_db_time(since);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT started_at, ended_at FROM consultations
                 WHERE assigned_manager = ?1
                   AND status IN ('resolved', 'closed')
                   AND started_at IS NOT NULL
                   AND ended_at IS NOT NULL
                   AND ended_at >= ?2",
            )?;
            let mut rows = stmt.query(params![manager_key, since])?;

            let mut total = 0.0;
            let mut samples = 0u32;
            while let Some(row) = rows.next()? {
                let started = from_db_time(0, &row.get::<_, String>(0)?)?;
                let ended = from_db_time(1, &row.get::<_, String>(1)?)?;
                let elapsed = ended - started;
                if elapsed < chrono::Duration::zero() {
                    continue;
                }
                total += elapsed.num_seconds() as f64 / 60.0;
                samples += 1;
            }

            Ok(if samples == 0 {
                None
            } else {
                Some(total / f64::from(samples))
            })
        })
        .await
        .map_err(crate::database::map_tr_err)
}
