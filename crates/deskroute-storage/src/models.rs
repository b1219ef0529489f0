// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row mapping between SQLite and the core domain types.
//!
//! Timestamps are stored as fixed-width RFC 3339 text in UTC
//! (`2026-01-01T09:30:00.000000Z`) so lexical order equals time order.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;
use rusqlite::types::Type;

pub use deskroute_core::types::{
    Capabilities, Consultation, ConsultationStatus, Manager, Rating, WorkingHours,
};

/// Columns selected by [`consultation_from_row`], joined with `topics` as `t`.
pub(crate) const CONSULTATION_SELECT: &str = "SELECT c.cons_id, c.status, c.assigned_manager,
        c.selected_question, t.language, c.language, c.consultation_type, c.source,
        c.software, c.category, c.created_at, c.updated_at, c.started_at, c.ended_at
     FROM consultations c
     LEFT JOIN topics t ON t.topic_key = c.selected_question";

/// Columns selected by [`manager_from_row`].
pub(crate) const MANAGER_SELECT: &str = "SELECT manager_key, external_user_id, name,
        capacity_limit, start_hour, end_hour, capabilities
     FROM managers";

/// SQL list of non-terminal statuses.
pub(crate) const OPEN_STATUSES: &str = "('created', 'open', 'pending')";

/// SQL list of statuses a manager is actively working in.
pub(crate) const IN_PROGRESS_STATUSES: &str = "('open', 'pending')";

/// SQL list of terminal statuses.
pub(crate) const TERMINAL_STATUSES: &str = "('resolved', 'closed', 'cancelled')";

pub fn to_db_time(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn from_db_time(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn opt_time(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    row.get::<_, Option<String>>(idx)?
        .map(|raw| from_db_time(idx, &raw))
        .transpose()
}

pub(crate) fn consultation_from_row(row: &Row<'_>) -> rusqlite::Result<Consultation> {
    let status: String = row.get(1)?;
    let status = ConsultationStatus::from_str(&status)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;
    let created_at: String = row.get(10)?;
    let updated_at: String = row.get(11)?;

    Ok(Consultation {
        cons_id: row.get(0)?,
        status,
        assigned_manager: row.get(2)?,
        selected_question: row.get(3)?,
        topic_language: row.get(4)?,
        language: row.get(5)?,
        consultation_type: row.get(6)?,
        source: row.get(7)?,
        software: row.get(8)?,
        category: row.get(9)?,
        created_at: from_db_time(10, &created_at)?,
        updated_at: from_db_time(11, &updated_at)?,
        started_at: opt_time(row, 12)?,
        ended_at: opt_time(row, 13)?,
    })
}

pub(crate) fn manager_from_row(row: &Row<'_>) -> rusqlite::Result<Manager> {
    let start: Option<u8> = row.get(4)?;
    let end: Option<u8> = row.get(5)?;
    let capabilities: String = row.get(6)?;
    let capabilities: Capabilities = serde_json::from_str(&capabilities)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;

    Ok(Manager {
        key: row.get(0)?,
        external_user_id: row.get(1)?,
        name: row.get(2)?,
        capacity_limit: row.get(3)?,
        working_hours: match (start, end) {
            (Some(start_hour), Some(end_hour)) => Some(WorkingHours {
                start_hour,
                end_hour,
            }),
            _ => None,
        },
        capabilities,
    })
}
