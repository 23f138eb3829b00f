//! Persistence seam for the attendance core.
//!
//! Handlers and aggregators receive a `Store` built once in `main`; nothing in
//! the crate reaches for a process-wide client. Every list operation returns
//! rows ordered by id so repeated reports are identical.

pub mod memory;
pub mod mysql;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::model::attendance::{AttendanceRecord, NewAttendance};
use crate::model::employee::{Employee, EmployeeStatus};
use crate::model::leave::{LeaveRecord, LeaveStatus, NewLeave};
use crate::model::work_report::{NewWorkReport, WorkReport};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("malformed {table} row {id}: {detail}")]
    Decode {
        table: &'static str,
        id: u64,
        detail: String,
    },

    #[error("in-memory store lock poisoned")]
    Poisoned,
}

/// Coarse attendance predicate: optional employee and a half-open
/// `[from, until)` date range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceScan {
    pub employee_id: Option<u64>,
    pub from: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}

impl AttendanceScan {
    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        self.employee_id.is_none_or(|id| record.employee_id == id)
            && self.from.is_none_or(|from| record.date >= from)
            && self.until.is_none_or(|until| record.date < until)
    }
}

/// Coarse leave predicate. `overlapping` is `(from, to)` tested as
/// `start_date <= to AND end_date >= from`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaveScan {
    pub employee_id: Option<u64>,
    pub status: Option<LeaveStatus>,
    pub overlapping: Option<(NaiveDate, NaiveDate)>,
}

impl LeaveScan {
    pub fn matches(&self, leave: &LeaveRecord) -> bool {
        self.employee_id.is_none_or(|id| leave.employee_id == id)
            && self.status.is_none_or(|s| leave.status == s)
            && self
                .overlapping
                .is_none_or(|(from, to)| leave.start_date <= to && leave.end_date >= from)
    }
}

/// Work report predicate: exact author and an inclusive `[from, to]` date
/// range, either bound optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkReportScan {
    pub prepared_by: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl WorkReportScan {
    pub fn matches(&self, report: &WorkReport) -> bool {
        self.prepared_by
            .as_deref()
            .is_none_or(|author| report.prepared_by.as_deref() == Some(author))
            && self.from.is_none_or(|from| report.date >= from)
            && self.to.is_none_or(|to| report.date <= to)
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Read-only view of the employee directory.
    async fn employees(&self, status: Option<EmployeeStatus>) -> Result<Vec<Employee>, StoreError>;

    async fn list_attendance(&self, scan: &AttendanceScan) -> Result<Vec<AttendanceRecord>, StoreError>;
    async fn get_attendance(&self, id: u64) -> Result<Option<AttendanceRecord>, StoreError>;
    /// Always inserts; several sessions per employee per day are allowed.
    async fn insert_attendance(&self, new: NewAttendance) -> Result<AttendanceRecord, StoreError>;
    /// Last write wins. Returns `false` when the id does not exist.
    async fn update_attendance(&self, record: &AttendanceRecord) -> Result<bool, StoreError>;
    async fn delete_attendance(&self, id: u64) -> Result<bool, StoreError>;

    async fn list_leaves(&self, scan: &LeaveScan) -> Result<Vec<LeaveRecord>, StoreError>;
    async fn get_leave(&self, id: u64) -> Result<Option<LeaveRecord>, StoreError>;
    async fn insert_leave(&self, new: NewLeave) -> Result<LeaveRecord, StoreError>;
    async fn update_leave(&self, record: &LeaveRecord) -> Result<bool, StoreError>;
    async fn delete_leave(&self, id: u64) -> Result<bool, StoreError>;

    /// Moves a leave from `from` to `to` only if it is still in `from`.
    async fn transition_leave(
        &self,
        id: u64,
        from: LeaveStatus,
        to: LeaveStatus,
    ) -> Result<bool, StoreError>;

    /// Newest visit first; ties broken by newest id.
    async fn list_work_reports(&self, scan: &WorkReportScan) -> Result<Vec<WorkReport>, StoreError>;
    async fn insert_work_report(&self, new: NewWorkReport) -> Result<WorkReport, StoreError>;
    /// Distinct non-empty `prepared_by` values, ascending.
    async fn work_report_authors(&self) -> Result<Vec<String>, StoreError>;
}
