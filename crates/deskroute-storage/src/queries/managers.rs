// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Manager directory reads, plus the upsert used by administration and seeding.

use deskroute_core::DeskrouteError;
use rusqlite::{OptionalExtension, params};

use crate::database::Database;
use crate::models::{MANAGER_SELECT, Manager, manager_from_row};

/// Insert or replace a manager record.
pub async fn upsert_manager(db: &Database, manager: &Manager) -> Result<(), DeskrouteError> {
    let capabilities = serde_json::to_string(&manager.capabilities).map_err(|e| {
        DeskrouteError::Storage {
            source: Box::new(e),
        }
    })?;
    let m = manager.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO managers (manager_key, external_user_id, name, capacity_limit,
                                       start_hour, end_hour, capabilities)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(manager_key) DO UPDATE SET
                     external_user_id = excluded.external_user_id,
                     name = excluded.name,
                     capacity_limit = excluded.capacity_limit,
                     start_hour = excluded.start_hour,
                     end_hour = excluded.end_hour,
                     capabilities = excluded.capabilities",
                params![
                    m.key,
                    m.external_user_id,
                    m.name,
                    m.capacity_limit,
                    m.working_hours.map(|h| h.start_hour),
                    m.working_hours.map(|h| h.end_hour),
                    capabilities,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All managers ordered by key.
pub async fn list_managers(db: &Database) -> Result<Vec<Manager>, DeskrouteError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!("{MANAGER_SELECT} ORDER BY manager_key ASC"))?;
            let rows = stmt.query_map([], manager_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

pub async fn get_manager(db: &Database, key: &str) -> Result<Option<Manager>, DeskrouteError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("{MANAGER_SELECT} WHERE manager_key = ?1"),
                params![key],
                manager_from_row,
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

pub async fn find_by_external_id(
    db: &Database,
    external_user_id: &str,
) -> Result<Option<Manager>, DeskrouteError> {
    let external_user_id = external_user_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("{MANAGER_SELECT} WHERE external_user_id = ?1"),
                params![external_user_id],
                manager_from_row,
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}
