// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Load arithmetic.

use deskroute_core::types::{LoadInfo, Manager};

/// Computes a manager's load from its open count and capacity.
pub struct LoadCalculator;

impl LoadCalculator {
    /// `round(count / limit * 100)`, capped at 100. A zero limit reads as full.
    pub fn load_percent(queue_count: u32, limit: u32) -> u32 {
        if limit == 0 {
            return 100;
        }
        let percent = (f64::from(queue_count) / f64::from(limit) * 100.0).round();
        percent.min(100.0) as u32
    }

    /// `limit - count`, floored at 0.
    pub fn available_slots(queue_count: u32, limit: u32) -> u32 {
        limit.saturating_sub(queue_count)
    }

    /// The count itself is never clamped; only the percentage is.
    pub fn compute(manager: &Manager, queue_count: u32, in_working_hours: bool) -> LoadInfo {
        LoadInfo {
            manager_key: manager.key.clone(),
            manager_name: manager.name.clone(),
            queue_count,
            limit: manager.capacity_limit,
            load_percent: Self::load_percent(queue_count, manager.capacity_limit),
            available_slots: Self::available_slots(queue_count, manager.capacity_limit),
            in_working_hours,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::manager;

    #[test]
    fn percent_rounds_to_nearest() {
        assert_eq!(LoadCalculator::load_percent(1, 3), 33);
        assert_eq!(LoadCalculator::load_percent(2, 3), 67);
        assert_eq!(LoadCalculator::load_percent(0, 5), 0);
        assert_eq!(LoadCalculator::load_percent(5, 5), 100);
    }

    #[test]
    fn over_capacity_caps_percent_but_keeps_count() {
        let load = LoadCalculator::compute(&manager("m1", 4), 7, true);
        assert_eq!(load.queue_count, 7);
        assert_eq!(load.load_percent, 100);
        assert_eq!(load.available_slots, 0);
    }

    #[test]
    fn zero_limit_is_full() {
        assert_eq!(LoadCalculator::load_percent(0, 0), 100);
        assert_eq!(LoadCalculator::available_slots(0, 0), 0);
    }

    #[test]
    fn slots_and_percent_bounds_hold() {
        for limit in 0..12u32 {
            for count in 0..20u32 {
                let slots = LoadCalculator::available_slots(count, limit);
                assert_eq!(i64::from(slots), (i64::from(limit) - i64::from(count)).max(0));
                assert!(LoadCalculator::load_percent(count, limit) <= 100);
            }
        }
    }
}
