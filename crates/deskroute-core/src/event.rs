// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound lifecycle events and the side effects they produce.
//!
//! Events arrive as JSON objects with a `kind` tag:
//!
//! ```json
//! {"kind": "status-changed", "cons_id": "42", "new_status": "open", "new_assignee": "17"}
//! ```
//!
//! Unrecognized kinds decode to [`EventKind::Unknown`] rather than failing, so
//! the state machine can report them as ignored.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DeskrouteError;
use crate::types::{MessageDirection, NoticeKind};

/// A normalized inbound event for one consultation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleEvent {
    pub cons_id: String,
    #[serde(flatten)]
    pub kind: EventKind,
    #[serde(default = "Utc::now")]
    pub received_at: DateTime<Utc>,
}

impl LifecycleEvent {
    pub fn new(cons_id: impl Into<String>, kind: EventKind) -> Self {
        Self {
            cons_id: cons_id.into(),
            kind,
            received_at: Utc::now(),
        }
    }

    /// Decode an event from its JSON wire form.
    pub fn from_json(raw: &str) -> Result<Self, DeskrouteError> {
        serde_json::from_str(raw).map_err(|e| DeskrouteError::InvalidEvent(e.to_string()))
    }
}

/// Tagged union of inbound event kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EventKind {
    /// A new consultation was registered.
    Created,
    /// The platform reassigned the conversation. `new_assignee` is the
    /// external user id.
    AssignmentChanged {
        #[serde(default)]
        new_assignee: Option<String>,
    },
    /// The platform changed the status, possibly with an assignee change.
    /// The status is kept raw so unknown values can be ignored.
    StatusChanged {
        new_status: String,
        #[serde(default)]
        new_assignee: Option<String>,
    },
    MessageReceived {
        direction: MessageDirection,
        #[serde(default)]
        message: Option<String>,
    },
    /// A rating callback from the messaging channel.
    RatingSubmitted {
        token: String,
        #[serde(default)]
        comment: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::AssignmentChanged { .. } => "assignment-changed",
            Self::StatusChanged { .. } => "status-changed",
            Self::MessageReceived { .. } => "message-received",
            Self::RatingSubmitted { .. } => "rating-submitted",
            Self::Unknown => "unknown",
        }
    }
}

/// A side effect taken while handling an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum SideEffect {
    Assigned { manager_key: String },
    StatusChanged { status: String },
    Touched,
    RatingRecorded,
    NoticeSent { kind: NoticeKind },
    Ignored { reason: String },
}

impl fmt::Display for SideEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assigned { .. } => write!(f, "assigned"),
            Self::StatusChanged { .. } => write!(f, "status_changed"),
            Self::Touched => write!(f, "touched"),
            Self::RatingRecorded => write!(f, "rating_recorded"),
            Self::NoticeSent { kind } => write!(f, "notice_sent:{kind}"),
            Self::Ignored { reason } => write!(f, "ignored:{reason}"),
        }
    }
}

/// Everything that happened while handling one event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventOutcome {
    pub effects: Vec<SideEffect>,
}

impl EventOutcome {
    pub fn ignored(reason: impl Into<String>) -> Self {
        Self {
            effects: vec![SideEffect::Ignored {
                reason: reason.into(),
            }],
        }
    }

    pub fn push(&mut self, effect: SideEffect) {
        self.effects.push(effect);
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Effect labels, or `["none"]` when nothing happened.
    pub fn labels(&self) -> Vec<String> {
        if self.effects.is_empty() {
            return vec!["none".to_string()];
        }
        self.effects.iter().map(ToString::to_string).collect()
    }

    pub fn sent(&self, kind: NoticeKind) -> bool {
        self.effects
            .iter()
            .any(|e| matches!(e, SideEffect::NoticeSent { kind: k } if *k == kind))
    }

    pub fn was_ignored(&self) -> bool {
        self.effects
            .iter()
            .any(|e| matches!(e, SideEffect::Ignored { .. }))
    }
}
