// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Working-hour availability.
//!
//! Manager windows are timezone-less local hours. Timestamps arrive in UTC
//! and are shifted by the configured offset before comparison.

use chrono::{DateTime, FixedOffset, Offset, Timelike, Utc};

use deskroute_core::types::{Manager, WorkingHours};

/// Restricts managers to those inside their working window.
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityFilter {
    offset: FixedOffset,
}

impl AvailabilityFilter {
    /// Out-of-range offsets fall back to UTC; config validation rejects them
    /// earlier.
    pub fn new(utc_offset_hours: i32) -> Self {
        let offset = utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());
        Self { offset }
    }

    pub fn local_hour(&self, at: DateTime<Utc>) -> u8 {
        // hour() is always < 24.
        at.with_timezone(&self.offset).hour() as u8
    }

    /// A manager without a configured window is always available.
    pub fn is_available(&self, manager: &Manager, at: DateTime<Utc>) -> bool {
        manager
            .working_hours
            .is_none_or(|hours| window_contains(hours, self.local_hour(at)))
    }
}

/// Whether `hour` falls in `[start_hour, end_hour)`.
///
/// `start_hour > end_hour` wraps past midnight; equal bounds cover the whole
/// day.
pub fn window_contains(hours: WorkingHours, hour: u8) -> bool {
    let WorkingHours {
        start_hour,
        end_hour,
    } = hours;
    match start_hour.cmp(&end_hour) {
        std::cmp::Ordering::Equal => true,
        std::cmp::Ordering::Less => (start_hour..end_hour).contains(&hour),
        std::cmp::Ordering::Greater => hour >= start_hour || hour < end_hour,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{at, manager};

    fn hours(start_hour: u8, end_hour: u8) -> WorkingHours {
        WorkingHours {
            start_hour,
            end_hour,
        }
    }

    #[test]
    fn day_window() {
        let day = hours(9, 18);
        assert!(!window_contains(day, 8));
        assert!(window_contains(day, 9));
        assert!(window_contains(day, 17));
        assert!(!window_contains(day, 18));
    }

    #[test]
    fn overnight_window_wraps() {
        let night = hours(22, 6);
        assert!(window_contains(night, 23));
        assert!(window_contains(night, 0));
        assert!(window_contains(night, 5));
        assert!(!window_contains(night, 6));
        assert!(!window_contains(night, 12));
    }

    #[test]
    fn equal_bounds_cover_the_day() {
        for hour in 0..24 {
            assert!(window_contains(hours(8, 8), hour));
        }
    }

    #[test]
    fn offset_shifts_local_hour() {
        let filter = AvailabilityFilter::new(5);
        // 04:30 UTC is 09:30 at UTC+5.
        assert_eq!(filter.local_hour(at(4, 30)), 9);

        let mut m = manager("m1", 5);
        m.working_hours = Some(hours(9, 18));
        assert!(filter.is_available(&m, at(4, 30)));
        assert!(!AvailabilityFilter::new(0).is_available(&m, at(4, 30)));
    }

    #[test]
    fn negative_offset_crosses_midnight() {
        assert_eq!(AvailabilityFilter::new(-3).local_hour(at(1, 0)), 22);
    }

    #[test]
    fn no_window_means_always_available() {
        let m = manager("m1", 5);
        assert!(AvailabilityFilter::new(0).is_available(&m, at(3, 0)));
    }

    #[test]
    fn absurd_offset_falls_back_to_utc() {
        assert_eq!(AvailabilityFilter::new(1000).local_hour(at(7, 0)), 7);
    }
}
