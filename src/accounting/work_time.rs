use std::fmt;

use chrono::{NaiveTime, Timelike};

use crate::error::AppError;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Elapsed time between a check-in and a check-out on the same date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkDuration {
    total_minutes: u32,
}

impl WorkDuration {
    pub fn from_minutes(total_minutes: u32) -> Self {
        Self { total_minutes }
    }

    pub fn total_minutes(&self) -> u32 {
        self.total_minutes
    }

    /// Whole hours, the unit the status thresholds are expressed in.
    pub fn hours(&self) -> u32 {
        self.total_minutes / 60
    }

    pub fn remainder_minutes(&self) -> u32 {
        self.total_minutes % 60
    }
}

impl fmt::Display for WorkDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}hr {}m", self.hours(), self.remainder_minutes())
    }
}

fn minute_of_day(t: NaiveTime) -> i64 {
    i64::from(t.hour()) * 60 + i64::from(t.minute())
}

/// Minutes between two clock times. A check-out earlier than the check-in is
/// read as the next day; only one wrap is representable.
pub fn worked_minutes(check_in: NaiveTime, check_out: NaiveTime) -> u32 {
    let mut total = minute_of_day(check_out) - minute_of_day(check_in);
    if total < 0 {
        total += MINUTES_PER_DAY;
    }
    total as u32
}

/// `None` when either side is missing: an open shift is a valid partial day.
pub fn work_duration(
    check_in: Option<NaiveTime>,
    check_out: Option<NaiveTime>,
) -> Option<WorkDuration> {
    match (check_in, check_out) {
        (Some(i), Some(o)) => Some(WorkDuration::from_minutes(worked_minutes(i, o))),
        _ => None,
    }
}

/// Parses an `HH:MM` (or `HH:MM:SS`) clock string.
pub fn parse_clock(raw: &str) -> Result<NaiveTime, AppError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|e| AppError::Computation(format!("invalid clock time '{}': {}", raw, e)))
}

/// Blank input counts as "not given".
pub fn parse_optional_clock(raw: Option<&str>) -> Result<Option<NaiveTime>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_clock(s).map(Some),
    }
}

pub fn format_clock(t: Option<NaiveTime>) -> Option<String> {
    t.map(|t| t.format("%H:%M").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> NaiveTime {
        parse_clock(s).unwrap()
    }

    #[test]
    fn same_day_span_is_plain_difference() {
        for (i, o) in [("09:00", "18:00"), ("00:00", "23:59"), ("07:15", "07:45")] {
            let expected = minute_of_day(t(o)) - minute_of_day(t(i));
            assert_eq!(i64::from(worked_minutes(t(i), t(o))), expected);
        }
    }

    #[test]
    fn overnight_shift_wraps_once() {
        let d = work_duration(Some(t("22:00")), Some(t("02:00"))).unwrap();
        assert_eq!(d.total_minutes(), 240);
        assert_eq!(d.to_string(), "4hr 0m");
    }

    #[test]
    fn nine_to_six_is_nine_hours() {
        let d = work_duration(Some(t("09:00")), Some(t("18:00"))).unwrap();
        assert_eq!(d.to_string(), "9hr 0m");
        assert_eq!(d.hours(), 9);
    }

    #[test]
    fn equal_times_are_zero() {
        let d = work_duration(Some(t("10:30")), Some(t("10:30"))).unwrap();
        assert_eq!(d.to_string(), "0hr 0m");
    }

    #[test]
    fn missing_side_has_no_duration() {
        assert_eq!(work_duration(Some(t("09:00")), None), None);
        assert_eq!(work_duration(None, Some(t("17:00"))), None);
        assert_eq!(work_duration(None, None), None);
    }

    #[test]
    fn remainder_minutes_are_kept() {
        let d = work_duration(Some(t("08:50")), Some(t("16:35"))).unwrap();
        assert_eq!(d.to_string(), "7hr 45m");
    }

    #[test]
    fn malformed_clock_is_a_computation_fault() {
        assert!(matches!(parse_clock("9am"), Err(AppError::Computation(_))));
        assert_eq!(parse_optional_clock(Some("  ")).unwrap(), None);
        assert_eq!(format_clock(Some(t("09:05:30"))), Some("09:05".to_string()));
    }
}
