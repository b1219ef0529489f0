// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Small deterministic text helpers used when building outgoing payloads.
//!
//! This crate provides:
//! - [`normalize_comment`]: line-break and whitespace collapsing
//! - [`resolve_display_name`]: person-first contact naming with a brand prefix
//! - [`build_transport_labels`]: closed-table mapping to ASCII label tokens
//! - [`resolve_language`]: explicit, topic, then default language selection
//!
//! Nothing here performs I/O. Lookup tables and marker lists come from
//! [`deskroute_config`] rather than from literals at call sites.

pub mod comment;
pub mod labels;
pub mod language;
pub mod naming;

pub use comment::normalize_comment;
pub use labels::build_transport_labels;
pub use language::resolve_language;
pub use naming::{ContactNames, is_person_name, resolve_display_name};
