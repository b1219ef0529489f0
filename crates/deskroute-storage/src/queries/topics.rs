// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classified topics. Only their language is read by the engine.

use deskroute_core::DeskrouteError;
use rusqlite::params;

use crate::database::Database;

/// Insert or replace a topic.
pub async fn upsert_topic(
    db: &Database,
    topic_key: &str,
    title: Option<&str>,
    language: Option<&str>,
) -> Result<(), DeskrouteError> {
    let topic_key = topic_key.to_string();
    let title = title.map(str::to_string);
    let language = language.map(str::to_string);
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO topics (topic_key, title, language) VALUES (?1, ?2, ?3)
                 ON CONFLICT(topic_key) DO UPDATE SET
                     title = excluded.title,
                     language = excluded.language",
                params![topic_key, title, language],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
