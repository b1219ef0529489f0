// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Consultation lifecycle engine for Deskroute.
//!
//! The [`ConsultationStateMachine`] is the central coordinator that:
//! - Applies inbound lifecycle events to the consultation store
//! - Auto-assigns new consultations to the least-loaded eligible manager
//! - Sends client notices through the [`NotificationGate`]
//! - Records client ratings for finished consultations

pub mod gate;
pub mod notices;
pub mod rating;
pub mod recording;
pub mod state_machine;

pub use gate::{NoticeDraft, NotificationGate, queue_update_key, reassignment_key};
pub use notices::{NoticeLanguage, has_classified_topic, is_support_only, queue_display_allowed};
pub use rating::{RatingToken, parse_rating_token, rating_buttons, rating_token};
pub use state_machine::{ConsultationStateMachine, EnginePorts};
