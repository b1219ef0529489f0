// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification ledger: a durable set of `(cons_id, notice_kind)` keys.

use chrono::Utc;
use deskroute_core::DeskrouteError;
use rusqlite::params;

use crate::database::Database;
use crate::models::to_db_time;

/// Insert the key unless present. Returns `true` when it was absent.
///
/// A single `INSERT OR IGNORE` against the primary key; the affected-row
/// count tells the caller whether this call won. Never read-then-write.
pub async fn insert_if_absent(
    db: &Database,
    cons_id: &str,
    notice_kind: &str,
) -> Result<bool, DeskrouteError> {
    let cons_id = cons_id.to_string();
    let notice_kind = notice_kind.to_string();
    let now = to_db_time(Utc::now());
    db.connection()
        .call(move |conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO notification_ledger (cons_id, notice_kind, recorded_at)
                 VALUES (?1, ?2, ?3)",
                params![cons_id, notice_kind, now],
            )?;
            Ok(inserted == 1)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Keys recorded for a consultation, in insertion order.
pub async fn kinds_for(db: &Database, cons_id: &str) -> Result<Vec<String>, DeskrouteError> {
    let cons_id = cons_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT notice_kind FROM notification_ledger
                 WHERE cons_id = ?1 ORDER BY rowid ASC",
            )?;
            let rows = stmt.query_map(params![cons_id], |row| row.get::<_, String>(0))?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support::setup_db;

    #[tokio::test]
    async fn second_insert_reports_present() {
        let (db, _dir) = setup_db().await;
        assert!(insert_if_absent(&db, "c1", "queue_update").await.unwrap());
        assert!(!insert_if_absent(&db, "c1", "queue_update").await.unwrap());
        assert!(insert_if_absent(&db, "c1", "reassignment:m2").await.unwrap());
        assert!(insert_if_absent(&db, "c2", "queue_update").await.unwrap());

        assert_eq!(
            kinds_for(&db, "c1").await.unwrap(),
            vec!["queue_update", "reassignment:m2"]
        );
    }

    #[tokio::test]
    async fn concurrent_inserts_have_one_winner() {
        let (db, _dir) = setup_db().await;

        let mut handles = Vec::new();
        for _ in 0..50 {
            let db = db.clone();
            handles.push(tokio::spawn(async move {
                insert_if_absent(&db, "c1", "queue_update").await.unwrap()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }
}
