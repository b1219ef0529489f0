// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builders for test managers and consultations.

use chrono::{DateTime, TimeZone, Utc};

use deskroute_core::types::{Capabilities, Consultation, ConsultationStatus, Manager};

/// 2026-03-02 (a Monday) at `hour:minute` UTC.
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, hour, minute, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// A manager with external id `ext-<key>`, no working window and no
/// capability restrictions.
pub fn manager(key: &str, capacity_limit: u32) -> Manager {
    Manager {
        key: key.to_string(),
        external_user_id: Some(format!("ext-{key}")),
        name: format!("Manager {key}"),
        capacity_limit,
        working_hours: None,
        capabilities: Capabilities::default(),
    }
}

/// An unassigned, classified consultation in `created` status, written in
/// Russian through Telegram.
pub fn consultation(cons_id: &str, created: DateTime<Utc>) -> Consultation {
    Consultation {
        cons_id: cons_id.to_string(),
        status: ConsultationStatus::Created,
        assigned_manager: None,
        selected_question: Some("q-accounting".to_string()),
        topic_language: None,
        language: Some("ru".to_string()),
        consultation_type: Some("Консультация по ведению учёта".to_string()),
        source: Some("telegram".to_string()),
        software: None,
        category: None,
        created_at: created,
        updated_at: created,
        started_at: None,
        ended_at: None,
    }
}

/// `consultation` already assigned to `manager_key` and open.
pub fn assigned(cons_id: &str, manager_key: &str, created: DateTime<Utc>) -> Consultation {
    Consultation {
        status: ConsultationStatus::Open,
        assigned_manager: Some(manager_key.to_string()),
        ..consultation(cons_id, created)
    }
}

/// A closed consultation handled by `manager_key` for `minutes`, ending at `ended`.
pub fn finished(
    cons_id: &str,
    manager_key: &str,
    ended: DateTime<Utc>,
    minutes: i64,
) -> Consultation {
    let started = ended - chrono::Duration::minutes(minutes);
    Consultation {
        status: ConsultationStatus::Closed,
        started_at: Some(started),
        ended_at: Some(ended),
        ..assigned(cons_id, manager_key, started)
    }
}
