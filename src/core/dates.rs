//! Day-count date arithmetic shared by the CPM engine, the comparator and
//! the window engine. All arithmetic is flat: a day is 86,400 seconds and
//! calendars never remove non-working days.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Convert a (possibly fractional) day count to a `Duration`.
pub fn days(count: f64) -> Duration {
    Duration::seconds((count * SECONDS_PER_DAY).round() as i64)
}

/// Whole-day difference `to - from`, truncated toward zero.
pub fn diff_days(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    (to - from).num_days()
}

/// Fractional-day difference `to - from`.
pub fn diff_days_f64(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_seconds() as f64 / SECONDS_PER_DAY
}

/// Last second of the month containing `date`.
pub fn end_of_month(date: NaiveDateTime) -> NaiveDateTime {
    first_of_next_month(date) - Duration::seconds(1)
}

/// Midnight on the first day of the month after the one containing `date`.
pub fn first_of_next_month(date: NaiveDateTime) -> NaiveDateTime {
    let (year, month) = if date.date().month() == 12 {
        (date.date().year() + 1, 1)
    } else {
        (date.date().year(), date.date().month() + 1)
    };
    first_of_month(year, month)
}

fn first_of_month(year: i32, month: u32) -> NaiveDateTime {
    // in range by construction: month is 1..=12
    NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap_or(NaiveDate::MIN)
        .and_hms_opt(0, 0, 0)
        .unwrap_or(NaiveDateTime::MIN)
}

/// Generate calendar-month spans covering `[start, end]`. Each span runs to
/// the last second of its month; the final span is clipped to `end`.
pub fn month_windows(start: NaiveDateTime, end: NaiveDateTime) -> Vec<(NaiveDateTime, NaiveDateTime)> {
    let mut windows = Vec::new();
    let mut current = start;
    while current < end {
        let window_end = end_of_month(current).min(end);
        windows.push((current, window_end));
        current = first_of_next_month(current);
    }
    windows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn fractional_days_round_trip() {
        let start = dt(2024, 1, 1);
        let finish = start + days(2.5);
        assert_eq!(diff_days_f64(start, finish), 2.5);
        assert_eq!(diff_days(start, finish), 2);
    }

    #[test]
    fn end_of_month_handles_december() {
        let eom = end_of_month(dt(2023, 12, 15));
        assert_eq!(eom.date(), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(first_of_next_month(dt(2023, 12, 15)), dt(2024, 1, 1));
    }

    #[test]
    fn end_of_month_handles_leap_february() {
        let eom = end_of_month(dt(2024, 2, 10));
        assert_eq!(eom.date(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn month_windows_clip_final_window() {
        let windows = month_windows(dt(2024, 1, 1), dt(2024, 3, 15));
        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0].0, dt(2024, 1, 1));
        assert_eq!(windows[1].0, dt(2024, 2, 1));
        assert_eq!(windows[2].0, dt(2024, 3, 1));
        assert_eq!(windows[2].1, dt(2024, 3, 15));
    }

    #[test]
    fn month_windows_empty_when_start_not_before_end() {
        assert!(month_windows(dt(2024, 3, 1), dt(2024, 3, 1)).is_empty());
    }
}
