// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability matching between a request's tags and a manager's.

use std::collections::BTreeSet;

use deskroute_core::types::{CapabilityFilter, Manager};

/// Decides whether a manager can serve a request.
///
/// The filter is a conjunction: every requested tag must be served. A
/// missing filter value matches all managers, and a manager with no tags in a
/// dimension serves every value of it. Tags compare case-insensitively.
pub struct CapabilityMatcher;

impl CapabilityMatcher {
    pub fn matches(manager: &Manager, filter: &CapabilityFilter) -> bool {
        let caps = &manager.capabilities;
        serves(&caps.software, filter.software.as_deref())
            && serves(&caps.categories, filter.category.as_deref())
            && serves(&caps.types, filter.consultation_type.as_deref())
    }

    /// Managers from `managers` that match, in input order.
    pub fn filter<'m>(
        managers: impl IntoIterator<Item = &'m Manager>,
        filter: &CapabilityFilter,
    ) -> Vec<&'m Manager> {
        managers
            .into_iter()
            .filter(|m| Self::matches(m, filter))
            .collect()
    }
}

fn serves(tags: &BTreeSet<String>, wanted: Option<&str>) -> bool {
    let Some(wanted) = wanted.map(str::trim).filter(|w| !w.is_empty()) else {
        return true;
    };
    let wanted = wanted.to_lowercase();
    tags.is_empty() || tags.iter().any(|t| t.trim().to_lowercase() == wanted)
}
