use chrono::NaiveDate;

use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::employee::EmployeeStatus;
use crate::model::leave::{LeaveRecord, LeaveStatus};
use crate::model::report::DailyDashboard;
use crate::store::{AttendanceScan, LeaveScan, Store, StoreError};

/// Absence is inferred, not counted, and clamped at zero because an employee
/// can be both present and on leave on the same day.
pub fn snapshot(
    today: NaiveDate,
    active_employees: usize,
    attendance: &[AttendanceRecord],
    leaves: &[LeaveRecord],
) -> DailyDashboard {
    let total_employees = active_employees as u32;
    let total_present = attendance
        .iter()
        .filter(|r| r.date == today && r.status == AttendanceStatus::Present)
        .count() as u32;
    let total_leave = leaves
        .iter()
        .filter(|l| l.is_approved() && l.covers(today))
        .count() as u32;

    DailyDashboard {
        total_employees,
        total_present,
        total_leave,
        total_absent: total_employees.saturating_sub(total_present + total_leave),
        date: today.format("%Y-%m-%d").to_string(),
    }
}

pub async fn daily_dashboard(store: &dyn Store, today: NaiveDate) -> Result<DailyDashboard, StoreError> {
    let attendance_scan = AttendanceScan {
        employee_id: None,
        from: Some(today),
        until: today.succ_opt(),
    };
    let leave_scan = LeaveScan {
        employee_id: None,
        status: Some(LeaveStatus::Approved),
        overlapping: Some((today, today)),
    };

    let (employees, attendance, leaves) = futures::try_join!(
        store.employees(Some(EmployeeStatus::Active)),
        store.list_attendance(&attendance_scan),
        store.list_leaves(&leave_scan),
    )?;

    Ok(snapshot(today, employees.len(), &attendance, &leaves))
}
