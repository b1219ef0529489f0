// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Consultation ratings. One per consultation; repeats are ignored.

use deskroute_core::DeskrouteError;
use rusqlite::{OptionalExtension, params};

use crate::database::Database;
use crate::models::{Rating, from_db_time, to_db_time};

/// Insert a rating unless the consultation already has one.
/// Returns whether a row was written.
pub async fn record_rating(db: &Database, rating: &Rating) -> Result<bool, DeskrouteError> {
    let r = rating.clone();
    db.connection()
        .call(move |conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO ratings
                     (cons_id, manager_key, rating, comment, question, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    r.cons_id,
                    r.manager_key,
                    r.value,
                    r.comment,
                    r.question,
                    to_db_time(r.created_at),
                ],
            )?;
            Ok(inserted == 1)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

pub async fn get_rating(db: &Database, cons_id: &str) -> Result<Option<Rating>, DeskrouteError> {
    let cons_id = cons_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT cons_id, manager_key, rating, comment, question, created_at
                 FROM ratings WHERE cons_id = ?1",
                params![cons_id],
                |row| {
                    let created_at: String = row.get(5)?;
                    Ok(Rating {
                        cons_id: row.get(0)?,
                        manager_key: row.get(1)?,
                        value: row.get(2)?,
                        comment: row.get(3)?,
                        question: row.get(4)?,
                        created_at: from_db_time(5, &created_at)?,
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}
