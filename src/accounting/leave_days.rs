use chrono::NaiveDate;

use crate::error::AppError;

/// Inclusive day count of `[start, end]`.
pub fn leave_days(start: NaiveDate, end: NaiveDate) -> Result<u32, AppError> {
    if end < start {
        return Err(AppError::validation("End date cannot be before start date."));
    }
    let span = (end - start).num_days() + 1;
    u32::try_from(span).map_err(|_| AppError::validation("Leave range is too long."))
}

/// Range intersection as used by the monthly report. The full day count of a
/// matching leave is attributed to the window; nothing is clipped.
pub fn overlaps(
    leave_start: NaiveDate,
    leave_end: NaiveDate,
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> bool {
    leave_start <= window_end && leave_end >= window_start
}
