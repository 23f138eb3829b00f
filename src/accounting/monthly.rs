use chrono::{Datelike, NaiveDate};
use futures::future::try_join_all;

use super::filter::EmployeeFilter;
use super::leave_days::overlaps;
use crate::error::AppError;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::employee::{Employee, EmployeeStatus};
use crate::model::leave::{LeaveRecord, LeaveStatus};
use crate::model::report::MonthlySummaryRow;
use crate::store::{AttendanceScan, LeaveScan, Store, StoreError};

/// Half-open `[start, end)` reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl ReportWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        if end <= start {
            return Err(AppError::validation("Report window end must be after its start"));
        }
        Ok(Self { start, end })
    }

    pub fn month(year: i32, month: u32) -> Result<Self, AppError> {
        let invalid = || AppError::validation(format!("Invalid month {}-{:02}", year, month));
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let end = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(invalid)?;
        Self::new(start, end)
    }

    /// Parses `YYYY-MM`.
    pub fn parse_month(raw: &str) -> Result<Self, AppError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AppError::validation("Month is required"));
        }
        let first = NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d")
            .map_err(|_| AppError::validation(format!("Month must be YYYY-MM, got '{}'", raw)))?;
        Self::month(first.year(), first.month())
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day < self.end
    }

    /// Leave inclusion test. The exclusive end is compared inclusively, so a
    /// leave starting on the first day after the window still matches.
    pub fn touches_leave(&self, leave: &LeaveRecord) -> bool {
        overlaps(leave.start_date, leave.end_date, self.start, self.end)
    }

    fn attendance_scan(&self, employee_id: u64) -> AttendanceScan {
        AttendanceScan {
            employee_id: Some(employee_id),
            from: Some(self.start),
            until: Some(self.end),
        }
    }

    fn approved_leave_scan(&self, employee_id: u64) -> LeaveScan {
        LeaveScan {
            employee_id: Some(employee_id),
            status: Some(LeaveStatus::Approved),
            overlapping: Some((self.start, self.end)),
        }
    }
}

/// `round(present / total * 100, 1)`, or zero for an empty period.
pub fn attendance_percentage(present: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (f64::from(present) / f64::from(total) * 1000.0).round() / 10.0
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub present: u32,
    pub absent: u32,
    pub leave_days: u32,
    /// Attendance and leave rows seen, including HALF_DAY ones.
    pub touched: usize,
}

impl Tally {
    /// HALF_DAY rows count as activity but land in neither bucket.
    pub fn collect(window: &ReportWindow, attendance: &[AttendanceRecord], leaves: &[LeaveRecord]) -> Self {
        let mut tally = Tally::default();
        for record in attendance.iter().filter(|r| window.contains(r.date)) {
            tally.touched += 1;
            match record.status {
                AttendanceStatus::Present => tally.present += 1,
                AttendanceStatus::Absent => tally.absent += 1,
                AttendanceStatus::HalfDay => {}
            }
        }
        for leave in leaves
            .iter()
            .filter(|l| l.is_approved() && window.touches_leave(l))
        {
            tally.touched += 1;
            tally.leave_days += leave.number_of_days;
        }
        tally
    }

    pub fn total(&self) -> u32 {
        self.present + self.absent + self.leave_days
    }

    pub fn percentage(&self) -> f64 {
        attendance_percentage(self.present, self.total())
    }

    pub fn into_row(self, employee: &Employee) -> MonthlySummaryRow {
        MonthlySummaryRow {
            id: employee.id,
            employee: employee.name.clone(),
            present: self.present,
            absent: self.absent,
            leave: self.leave_days,
            percentage: format!("{:.1}", self.percentage()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MonthlyReport {
    pub window: ReportWindow,
    pub employee: EmployeeFilter,
    /// Emit all-zero rows for roster employees with no activity in the window.
    pub include_zero_activity_employees: bool,
}

async fn tally_employee(
    store: &dyn Store,
    window: &ReportWindow,
    employee: &Employee,
) -> Result<Tally, StoreError> {
    let attendance_scan = window.attendance_scan(employee.id);
    let leave_scan = window.approved_leave_scan(employee.id);
    let (attendance, leaves) = futures::try_join!(
        store.list_attendance(&attendance_scan),
        store.list_leaves(&leave_scan),
    )?;
    Ok(Tally::collect(window, &attendance, &leaves))
}

/// One row per ACTIVE employee matching the filter, ordered by employee id.
/// Employees are tallied concurrently; nothing is cached.
pub async fn monthly_summary(
    store: &dyn Store,
    report: &MonthlyReport,
) -> Result<Vec<MonthlySummaryRow>, StoreError> {
    let mut roster: Vec<Employee> = store
        .employees(Some(EmployeeStatus::Active))
        .await?
        .into_iter()
        .filter(|e| e.is_active() && report.employee.matches(e))
        .collect();
    roster.sort_by_key(|e| e.id);

    let tallies = try_join_all(
        roster
            .iter()
            .map(|employee| tally_employee(store, &report.window, employee)),
    )
    .await?;

    let rows: Vec<MonthlySummaryRow> = roster
        .iter()
        .zip(tallies)
        .filter(|(_, tally)| report.include_zero_activity_employees || tally.touched > 0)
        .map(|(employee, tally)| tally.into_row(employee))
        .collect();

    tracing::debug!(
        window_start = %report.window.start(),
        window_end = %report.window.end(),
        filtered = !report.employee.is_wildcard(),
        roster = roster.len(),
        rows = rows.len(),
        "Monthly summary computed"
    );
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounting::filter::NameMatch;
    use crate::model::attendance::WorkLocation;
    use crate::model::leave::LeaveType;
    use crate::store::memory::MemoryStore;
    use crate::store::memory::fixtures::{attendance, date, leave, roster};

    fn report(employee: Option<&str>, include_zero: bool) -> MonthlyReport {
        MonthlyReport {
            window: ReportWindow::parse_month("2025-10").unwrap(),
            employee: EmployeeFilter::parse(employee, NameMatch::Substring),
            include_zero_activity_employees: include_zero,
        }
    }

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::with_employees(roster());
        for (id, day, status) in [
            (1, "2025-10-01", AttendanceStatus::Present),
            (1, "2025-10-02", AttendanceStatus::Present),
            (1, "2025-10-03", AttendanceStatus::Absent),
            (1, "2025-10-06", AttendanceStatus::HalfDay),
            (1, "2025-09-30", AttendanceStatus::Present),
            (3, "2025-10-01", AttendanceStatus::Present),
        ] {
            store.insert_attendance(attendance(id, day, status)).await.unwrap();
        }
        for new in [
            leave(1, "2025-10-20", "2025-10-21", LeaveStatus::Approved),
            leave(1, "2025-10-27", "2025-10-29", LeaveStatus::Pending),
            leave(2, "2025-09-29", "2025-10-03", LeaveStatus::Approved),
        ] {
            store.insert_leave(new).await.unwrap();
        }
        store
    }

    #[test]
    fn month_window_is_half_open() {
        let w = ReportWindow::parse_month("2025-12").unwrap();
        assert_eq!(w.start(), date("2025-12-01"));
        assert_eq!(w.end(), date("2026-01-01"));
        assert!(w.contains(date("2025-12-31")));
        assert!(!w.contains(date("2026-01-01")));
    }

    #[test]
    fn bad_month_is_a_validation_error() {
        assert!(matches!(ReportWindow::parse_month(""), Err(AppError::Validation(_))));
        assert!(matches!(ReportWindow::parse_month("2025-13"), Err(AppError::Validation(_))));
        assert!(matches!(ReportWindow::parse_month("Oct"), Err(AppError::Validation(_))));
    }

    #[test]
    fn percentage_rounds_to_one_decimal() {
        assert_eq!(attendance_percentage(0, 0), 0.0);
        assert_eq!(attendance_percentage(2, 3), 66.7);
        assert_eq!(attendance_percentage(1, 8), 12.5);
        assert_eq!(attendance_percentage(5, 5), 100.0);
    }

    #[test]
    fn empty_tally_renders_zero_percentage() {
        let e = roster().remove(0);
        let row = Tally::default().into_row(&e);
        assert_eq!(row.percentage, "0.0");
        assert_eq!((row.present, row.absent, row.leave), (0, 0, 0));
    }

    #[test]
    fn leave_days_are_not_clipped_to_window() {
        let window = ReportWindow::parse_month("2025-10").unwrap();
        let spanning = LeaveRecord {
            id: 1,
            employee_id: 1,
            leave_type: LeaveType::Sick,
            start_date: date("2025-09-29"),
            end_date: date("2025-10-03"),
            number_of_days: 5,
            status: LeaveStatus::Approved,
            reason: "surgery".to_string(),
        };
        let tally = Tally::collect(&window, &[], &[spanning]);
        assert_eq!(tally.leave_days, 5);
    }

    #[test]
    fn half_day_is_activity_but_not_counted() {
        let window = ReportWindow::parse_month("2025-10").unwrap();
        let record = AttendanceRecord {
            id: 1,
            employee_id: 1,
            date: date("2025-10-02"),
            check_in: None,
            check_out: None,
            work_hr: Some("5hr 0m".to_string()),
            status: AttendanceStatus::HalfDay,
            location: WorkLocation::Site,
            site_name: Some("Dock 4".to_string()),
        };
        let tally = Tally::collect(&window, &[record], &[]);
        assert_eq!((tally.present, tally.absent, tally.touched), (0, 0, 1));
    }

    #[actix_web::test]
    async fn roster_driven_summary() {
        let store = seeded().await;
        let rows = monthly_summary(&store, &report(None, true)).await.unwrap();

        let names: Vec<&str> = rows.iter().map(|r| r.employee.as_str()).collect();
        assert_eq!(names, vec!["Amara", "Samuel", "Lina"]);

        let amara = &rows[0];
        assert_eq!((amara.present, amara.absent, amara.leave), (2, 1, 2));
        assert_eq!(amara.percentage, "40.0");

        let samuel = &rows[1];
        assert_eq!((samuel.present, samuel.absent, samuel.leave), (0, 0, 5));
        assert_eq!(samuel.percentage, "0.0");

        let lina = &rows[2];
        assert_eq!((lina.present, lina.absent, lina.leave), (0, 0, 0));
        assert_eq!(lina.percentage, "0.0");
    }

    #[actix_web::test]
    async fn zero_activity_employees_can_be_omitted() {
        let store = seeded().await;
        let rows = monthly_summary(&store, &report(None, false)).await.unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.employee.as_str()).collect();
        assert_eq!(names, vec!["Amara", "Samuel"]);
    }

    #[actix_web::test]
    async fn employee_filter_is_substring() {
        let store = seeded().await;
        let rows = monthly_summary(&store, &report(Some("ama"), true)).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].employee, "Amara");
    }

    #[actix_web::test]
    async fn repeated_runs_are_identical() {
        let store = seeded().await;
        let first = monthly_summary(&store, &report(None, true)).await.unwrap();
        let second = monthly_summary(&store, &report(None, true)).await.unwrap();
        assert_eq!(first, second);
    }

    #[actix_web::test]
    async fn reports_reflect_later_writes() {
        let store = seeded().await;
        let before = monthly_summary(&store, &report(Some("lina"), true)).await.unwrap();
        store
            .insert_attendance(attendance(4, "2025-10-15", AttendanceStatus::Present))
            .await
            .unwrap();
        let after = monthly_summary(&store, &report(Some("lina"), true)).await.unwrap();
        assert_eq!(before[0].present, 0);
        assert_eq!(after[0].present, 1);
        assert_eq!(after[0].percentage, "100.0");
    }
}
