// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules, one per table.

pub mod consultations;
pub mod ledger;
pub mod managers;
pub mod ratings;
pub mod topics;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, TimeZone, Utc};
    use tempfile::TempDir;

    use crate::database::Database;
    use crate::models::{Capabilities, Consultation, ConsultationStatus, Manager};

    pub async fn setup_db() -> (Database, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::open(path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

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

    pub fn consultation(
        cons_id: &str,
        manager: Option<&str>,
        created: DateTime<Utc>,
    ) -> Consultation {
        Consultation {
            cons_id: cons_id.to_string(),
            status: ConsultationStatus::Open,
            assigned_manager: manager.map(str::to_string),
            selected_question: None,
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
}
