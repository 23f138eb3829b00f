use chrono::NaiveTime;

use super::work_time::{WorkDuration, work_duration};
use crate::model::attendance::AttendanceStatus;

pub const FULL_DAY_HOURS: u32 = 8;
pub const HALF_DAY_HOURS: u32 = 4;

pub fn classify_hours(hours: u32) -> AttendanceStatus {
    if hours >= FULL_DAY_HOURS {
        AttendanceStatus::Present
    } else if hours >= HALF_DAY_HOURS {
        AttendanceStatus::HalfDay
    } else {
        AttendanceStatus::Absent
    }
}

/// Derived attendance facts for one check-in/check-out pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Derived {
    pub duration: Option<WorkDuration>,
    pub status: AttendanceStatus,
}

impl Derived {
    pub fn work_hr(&self) -> Option<String> {
        self.duration.map(|d| d.to_string())
    }
}

/// `fallback` is only consulted when neither time is present: the declared
/// status on creation, the record's current status on correction.
pub fn derive(
    check_in: Option<NaiveTime>,
    check_out: Option<NaiveTime>,
    fallback: Option<AttendanceStatus>,
) -> Derived {
    let duration = work_duration(check_in, check_out);
    let status = match (check_in, check_out, duration) {
        (Some(_), Some(_), Some(d)) => classify_hours(d.hours()),
        // open shift is optimistically present
        (Some(_), None, _) => AttendanceStatus::Present,
        (None, None, _) => fallback.unwrap_or(AttendanceStatus::Absent),
        _ => AttendanceStatus::Absent,
    };
    Derived { duration, status }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounting::work_time::parse_clock;

    fn t(s: &str) -> Option<NaiveTime> {
        Some(parse_clock(s).unwrap())
    }

    #[test]
    fn thresholds() {
        assert_eq!(classify_hours(0), AttendanceStatus::Absent);
        assert_eq!(classify_hours(3), AttendanceStatus::Absent);
        assert_eq!(classify_hours(4), AttendanceStatus::HalfDay);
        assert_eq!(classify_hours(7), AttendanceStatus::HalfDay);
        assert_eq!(classify_hours(8), AttendanceStatus::Present);
        assert_eq!(classify_hours(12), AttendanceStatus::Present);
    }

    #[test]
    fn partial_hours_round_down() {
        let d = derive(t("09:00"), t("16:59"), None);
        assert_eq!(d.status, AttendanceStatus::HalfDay);
        assert_eq!(d.work_hr().as_deref(), Some("7hr 59m"));
    }

    #[test]
    fn overnight_is_half_day() {
        let d = derive(t("22:00"), t("02:00"), None);
        assert_eq!(d.status, AttendanceStatus::HalfDay);
        assert_eq!(d.work_hr().as_deref(), Some("4hr 0m"));
    }

    #[test]
    fn full_day_is_present() {
        let d = derive(t("09:00"), t("18:00"), None);
        assert_eq!(d.status, AttendanceStatus::Present);
        assert_eq!(d.work_hr().as_deref(), Some("9hr 0m"));
    }

    #[test]
    fn open_shift_beats_thresholds() {
        let d = derive(t("09:00"), None, Some(AttendanceStatus::Absent));
        assert_eq!(d.status, AttendanceStatus::Present);
        assert_eq!(d.work_hr(), None);
    }

    #[test]
    fn no_times_is_absent_unless_declared() {
        assert_eq!(derive(None, None, None).status, AttendanceStatus::Absent);
        assert_eq!(
            derive(None, None, Some(AttendanceStatus::HalfDay)).status,
            AttendanceStatus::HalfDay
        );
    }

    #[test]
    fn checkout_without_checkin_is_absent() {
        let d = derive(None, t("17:00"), Some(AttendanceStatus::Present));
        assert_eq!(d.status, AttendanceStatus::Absent);
    }

    #[test]
    fn identical_times_are_absent() {
        let d = derive(t("10:00"), t("10:00"), None);
        assert_eq!(d.status, AttendanceStatus::Absent);
        assert_eq!(d.work_hr().as_deref(), Some("0hr 0m"));
    }
}
