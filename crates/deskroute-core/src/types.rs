// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across all Deskroute crates.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

// --- Adapter identity ---

/// Health status reported by an adapter's health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a port.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Transport,
    Observability,
}

// --- Consultation lifecycle ---

/// Lifecycle status of a consultation.
///
/// `Resolved`, `Closed` and `Cancelled` are terminal.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ConsultationStatus {
    Created,
    Open,
    Pending,
    Resolved,
    Closed,
    Cancelled,
}

impl ConsultationStatus {
    /// All terminal statuses.
    pub const TERMINAL: [ConsultationStatus; 3] = [
        ConsultationStatus::Resolved,
        ConsultationStatus::Closed,
        ConsultationStatus::Cancelled,
    ];

    /// All statuses, in lifecycle order.
    pub const ALL: [ConsultationStatus; 6] = [
        ConsultationStatus::Created,
        ConsultationStatus::Open,
        ConsultationStatus::Pending,
        ConsultationStatus::Resolved,
        ConsultationStatus::Closed,
        ConsultationStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        self.into()
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved | Self::Closed | Self::Cancelled)
    }

    /// Terminal statuses that represent a finished (not abandoned) consultation.
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Resolved | Self::Closed)
    }

    /// Whether moving from `self` to `next` is permitted.
    ///
    /// `created -> open <-> pending`, and any live status may finish.
    /// Terminal statuses accept nothing. Staying put is always allowed for a
    /// live status.
    pub fn can_transition_to(self, next: ConsultationStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        if self == next || next.is_terminal() {
            return true;
        }
        matches!(
            (self, next),
            (Self::Created, Self::Open) | (Self::Open, Self::Pending) | (Self::Pending, Self::Open)
        )
    }
}

/// Who authored a message on the chat platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageDirection {
    /// Client-authored.
    Incoming,
    /// Agent- or system-authored.
    Outgoing,
}

// --- Managers ---

/// Local-hour working window. `start_hour > end_hour` wraps past midnight;
/// `start_hour == end_hour` covers the whole day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub start_hour: u8,
    pub end_hour: u8,
}

/// Tags a manager may serve. An empty set in a dimension means unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    #[serde(default)]
    pub software: BTreeSet<String>,
    #[serde(default)]
    pub categories: BTreeSet<String>,
    #[serde(default)]
    pub types: BTreeSet<String>,
}

/// A human consultant. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manager {
    /// Internal key.
    pub key: String,
    /// User id on the external chat platform.
    pub external_user_id: Option<String>,
    pub name: String,
    /// Maximum concurrent open consultations.
    pub capacity_limit: u32,
    pub working_hours: Option<WorkingHours>,
    pub capabilities: Capabilities,
}

/// Conjunction of optional capability tags. `None` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityFilter {
    pub software: Option<String>,
    pub category: Option<String>,
    pub consultation_type: Option<String>,
}

impl CapabilityFilter {
    pub fn any() -> Self {
        Self::default()
    }
}

// --- Consultations ---

/// A single client consultation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consultation {
    pub cons_id: String,
    pub status: ConsultationStatus,
    pub assigned_manager: Option<String>,
    /// Classified topic. `None` until the request has been classified.
    pub selected_question: Option<String>,
    /// Language recorded on the linked topic, if any.
    pub topic_language: Option<String>,
    /// Language chosen explicitly by the client.
    pub language: Option<String>,
    pub consultation_type: Option<String>,
    /// Channel of origin.
    pub source: Option<String>,
    pub software: Option<String>,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl Consultation {
    /// Capability filter derived from this consultation's tags.
    pub fn capability_filter(&self) -> CapabilityFilter {
        CapabilityFilter {
            software: self.software.clone(),
            category: self.category.clone(),
            consultation_type: self.consultation_type.clone(),
        }
    }
}

/// A status/assignee write. `assigned_manager: None` leaves the assignee untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsultationUpdate {
    pub cons_id: String,
    pub status: ConsultationStatus,
    pub assigned_manager: Option<String>,
    pub updated_at: DateTime<Utc>,
    /// Apply only while the stored row has no assignee (auto-assignment).
    pub only_if_unassigned: bool,
}

// --- Derived views ---

/// Current load of one manager. Never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadInfo {
    pub manager_key: String,
    pub manager_name: String,
    /// Non-terminal consultations currently assigned. Never clamped.
    pub queue_count: u32,
    pub limit: u32,
    /// Rounded percentage, capped at 100.
    pub load_percent: u32,
    pub available_slots: u32,
    pub in_working_hours: bool,
}

/// Queue position and wait estimate for one manager's backlog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitEstimate {
    pub queue_position: Option<u32>,
    pub estimated_wait_minutes: Option<u64>,
    pub estimated_wait_hours: Option<u64>,
}

impl WaitEstimate {
    /// The all-`None` estimate.
    pub fn unknown() -> Self {
        Self::default()
    }
}

/// Queue information for one consultation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueInfo {
    pub manager_key: Option<String>,
    #[serde(flatten)]
    pub wait: WaitEstimate,
    pub avg_resolution_minutes: Option<f64>,
}

/// Trailing-window average handling time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AvgResolution {
    pub avg_resolution_minutes: Option<f64>,
}

// --- Notices ---

/// Kind of automated notice sent to a client.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Accepted,
    Reassignment,
    QueueUpdate,
    Cancellation,
    Closure,
}

impl NoticeKind {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Whether this kind may be sent for a consultation in a terminal status.
    pub fn allowed_when_terminal(self) -> bool {
        matches!(self, Self::Cancellation | Self::Closure)
    }
}

/// An inline button attached to a notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeButton {
    pub text: String,
    pub callback_data: String,
}

/// A notice handed to the outbound transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundNotice {
    pub cons_id: String,
    pub kind: NoticeKind,
    /// Channel of origin of the consultation, if known.
    pub channel: Option<String>,
    pub text: String,
    /// Transport labels, each matching `[A-Za-z0-9_-]+`.
    pub labels: Vec<String>,
    /// Rows of buttons.
    pub buttons: Vec<Vec<NoticeButton>>,
    /// Whether the transport may count this message toward first-response timers.
    pub counts_toward_response_metrics: bool,
}

// --- Ratings ---

/// Client feedback for a finished consultation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub cons_id: String,
    pub manager_key: Option<String>,
    /// 1..=5
    pub value: u8,
    /// Normalized comment; empty when none was given.
    pub comment: String,
    pub question: Option<String>,
    pub created_at: DateTime<Utc>,
}
