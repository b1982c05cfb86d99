//! Sobriety streak and milestone computation
//!
//! All streak math runs on UTC day keys so that two requests made in the
//! same UTC day always agree, regardless of the caller's local time.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

/// A named point in the recovery journey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Milestone {
    pub days: i64,
    pub name: &'static str,
}

/// Milestone catalog, ascending by day count
pub const MILESTONES: &[Milestone] = &[
    Milestone {
        days: 1,
        name: "First Day",
    },
    Milestone {
        days: 7,
        name: "One Week",
    },
    Milestone {
        days: 30,
        name: "One Month",
    },
    Milestone {
        days: 90,
        name: "Three Months",
    },
    Milestone {
        days: 180,
        name: "Six Months",
    },
    Milestone {
        days: 365,
        name: "One Year",
    },
];

/// Truncate an instant to its UTC day key
pub fn day_key(instant: DateTime<Utc>) -> NaiveDate {
    instant.date_naive()
}

/// Midnight UTC of the given day, for storing day keys as datetimes
pub fn day_start(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// Whole days sober as of now.
///
/// The start day itself counts as day zero; a start day in the future
/// counts as zero rather than going negative.
pub fn sober_days(start_day: NaiveDate, now: DateTime<Utc>) -> i64 {
    let today = day_key(now);
    if start_day > today {
        return 0;
    }

    (today - start_day).num_days()
}

/// Milestones reached after the given number of sober days, in catalog order
pub fn achieved_milestones(days: i64) -> Vec<Milestone> {
    MILESTONES
        .iter()
        .copied()
        .filter(|milestone| days >= milestone.days)
        .collect()
}

/// Parse a client-supplied sobriety start as either a bare date
/// (`2025-03-10`) or a full RFC 3339 timestamp, normalized to the start
/// of its UTC day.
pub fn parse_start_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(day_start(day));
    }

    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|instant| day_start(day_key(instant.with_timezone(&Utc))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn test_day_key_ignores_time_of_day() {
        let morning = utc(2025, 3, 10, 0, 0, 1);
        let night = utc(2025, 3, 10, 23, 59, 59);
        assert_eq!(day_key(morning), day_key(night));

        let next_day = utc(2025, 3, 11, 0, 0, 0);
        assert_ne!(day_key(morning), day_key(next_day));
    }

    #[test]
    fn test_day_start_is_midnight_of_same_day() {
        let instant = utc(2025, 3, 10, 17, 45, 12);
        let start = day_start(day_key(instant));

        assert_eq!(start, utc(2025, 3, 10, 0, 0, 0));
        assert!(start <= instant);
        assert_eq!(day_key(start), day_key(instant));
    }

    #[test]
    fn test_sober_days_started_today() {
        let now = utc(2025, 3, 10, 18, 0, 0);
        let start = day_key(utc(2025, 3, 10, 2, 0, 0));
        assert_eq!(sober_days(start, now), 0);
    }

    #[test]
    fn test_sober_days_started_yesterday() {
        // Late-night start still counts as a full day the next morning
        let start = day_key(utc(2025, 3, 9, 23, 50, 0));
        let now = utc(2025, 3, 10, 0, 10, 0);
        assert_eq!(sober_days(start, now), 1);
    }

    #[test]
    fn test_sober_days_future_start_is_zero() {
        let start = day_key(utc(2025, 4, 1, 0, 0, 0));
        let now = utc(2025, 3, 10, 12, 0, 0);
        assert_eq!(sober_days(start, now), 0);
    }

    #[test]
    fn test_sober_days_long_streak() {
        let start = day_key(utc(2024, 3, 10, 8, 0, 0));
        let now = utc(2025, 3, 10, 8, 0, 0);
        assert_eq!(sober_days(start, now), 365);
    }

    #[test]
    fn test_milestones_before_first_threshold() {
        assert!(achieved_milestones(0).is_empty());
    }

    #[test]
    fn test_milestones_partial() {
        let reached = achieved_milestones(29);
        let names: Vec<&str> = reached.iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["First Day", "One Week"]);
    }

    #[test]
    fn test_milestones_exact_threshold_counts() {
        let reached = achieved_milestones(30);
        assert_eq!(reached.last().unwrap().name, "One Month");
    }

    #[test]
    fn test_milestones_full_catalog_in_order() {
        let reached = achieved_milestones(400);
        assert_eq!(reached.len(), MILESTONES.len());

        // Ascending by day count
        for pair in reached.windows(2) {
            assert!(pair[0].days < pair[1].days);
        }
        assert_eq!(reached.last().unwrap().name, "One Year");
    }

    #[test]
    fn test_parse_start_date_bare_date() {
        let parsed = parse_start_date("2025-03-10").unwrap();
        assert_eq!(parsed, utc(2025, 3, 10, 0, 0, 0));
    }

    #[test]
    fn test_parse_start_date_timestamp_truncates_to_day() {
        let parsed = parse_start_date("2025-03-10T17:45:12Z").unwrap();
        assert_eq!(parsed, utc(2025, 3, 10, 0, 0, 0));
    }

    #[test]
    fn test_parse_start_date_offset_converts_to_utc_first() {
        // 01:30 at +03:00 is 22:30 the previous UTC day
        let parsed = parse_start_date("2025-03-11T01:30:00+03:00").unwrap();
        assert_eq!(parsed, utc(2025, 3, 10, 0, 0, 0));
    }

    #[test]
    fn test_parse_start_date_rejects_garbage() {
        assert!(parse_start_date("").is_none());
        assert!(parse_start_date("yesterday").is_none());
        assert!(parse_start_date("03/10/2025").is_none());
    }
}
