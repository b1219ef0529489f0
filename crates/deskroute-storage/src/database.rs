// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All reads and writes are serialized through tokio-rusqlite's single
//! background thread. Do NOT create additional Connection instances for
//! writes; the notification ledger relies on this for its atomicity.

use std::time::Duration;

use deskroute_core::DeskrouteError;
use tracing::debug;

use crate::migrations;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the engine's SQLite database.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if needed) the database at `path` in WAL mode and apply
    /// pending migrations.
    pub async fn open(path: &str) -> Result<Self, DeskrouteError> {
        Self::open_with(path, true).await
    }

    /// Open with an explicit journal mode choice.
    ///
    /// `:memory:` is not supported: migrations run on a short-lived blocking
    /// connection before the shared async connection is opened.
    pub async fn open_with(path: &str, wal_mode: bool) -> Result<Self, DeskrouteError> {
        let migrate_path = path.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), DeskrouteError> {
            let mut conn = rusqlite::Connection::open(&migrate_path).map_err(storage_err)?;
            if wal_mode {
                let mode: String = conn
                    .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
                    .map_err(storage_err)?;
                debug!(mode, "journal mode set");
            }
            migrations::run_migrations(&mut conn)
        })
        .await
        .map_err(|e| DeskrouteError::Internal(format!("migration task failed: {e}")))??;

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(storage_err)?;
        conn.call(|conn| -> Result<(), rusqlite::Error> {
            // Per-connection settings; foreign_keys does not persist.
            conn.pragma_update(None, "foreign_keys", true)?;
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            conn.busy_timeout(BUSY_TIMEOUT)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The shared async connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Close the connection, waiting for queued calls to finish.
    pub async fn close(self) -> Result<(), DeskrouteError> {
        self.conn.close().await.map_err(map_tr_err)
    }
}

/// Map a tokio-rusqlite error into [`DeskrouteError::Storage`].
///
/// The concrete parameter type also pins the error type of every `call`
/// closure to `rusqlite::Error`.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> DeskrouteError {
    DeskrouteError::Storage {
        source: Box::new(e),
    }
}

fn storage_err(e: rusqlite::Error) -> DeskrouteError {
    DeskrouteError::Storage {
        source: Box::new(e),
    }
}
