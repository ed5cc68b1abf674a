mod common;

use chrono::Duration;
use common::{activity, dt};
use delaymap::analysis::activity_delay_days;
use delaymap::forensic::{custom_windows, monthly_windows};
use proptest::prelude::*;

proptest! {
    #[test]
    fn custom_windows_tile_the_horizon(horizon_days in 1i64..400, period_days in 1u32..60) {
        let start = dt(2024, 1, 1);
        let end = start + Duration::days(horizon_days);
        let windows = custom_windows(start, end, period_days);

        prop_assert!(!windows.is_empty());
        prop_assert_eq!(windows[0].start_date, start);
        prop_assert_eq!(windows.last().unwrap().end_date, end);
        for window in &windows {
            prop_assert!(window.start_date < window.end_date);
        }
        for pair in windows.windows(2) {
            prop_assert_eq!(pair[0].end_date, pair[1].start_date);
        }
    }

    #[test]
    fn monthly_windows_tile_the_horizon(offset_days in 0i64..365, span_days in 1i64..300) {
        // a mid-day end keeps the horizon off the month-boundary instant
        let start = dt(2024, 1, 1) + Duration::days(offset_days);
        let end = start + Duration::days(span_days) + Duration::hours(12);
        let windows = monthly_windows(start, end);

        prop_assert!(!windows.is_empty());
        prop_assert_eq!(windows[0].start_date, start);
        prop_assert_eq!(windows.last().unwrap().end_date, end);
        // interior boundaries sit on the last second of each month
        for pair in windows.windows(2) {
            prop_assert_eq!(pair[1].start_date - pair[0].end_date, Duration::seconds(1));
        }
    }

    #[test]
    fn planned_delay_is_antisymmetric(baseline_offset in -100i64..100, current_offset in -100i64..100) {
        let anchor = dt(2024, 6, 1);
        let baseline = activity(
            "A",
            5.0,
            anchor,
            anchor + Duration::days(baseline_offset),
        );
        let current = activity(
            "A",
            5.0,
            anchor,
            anchor + Duration::days(current_offset),
        );
        let forward = activity_delay_days(&baseline, &current);
        let backward = activity_delay_days(&current, &baseline);
        prop_assert_eq!(forward, -backward);
        prop_assert_eq!(forward, (current_offset - baseline_offset) as f64);
    }
}
