use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use sqlx::mysql::MySqlArguments;
use sqlx::query::QueryAs;
use sqlx::{FromRow, MySql, MySqlPool};
use std::str::FromStr;

use super::{AttendanceScan, LeaveScan, Store, StoreError, WorkReportScan};
use crate::model::attendance::{AttendanceRecord, AttendanceStatus, NewAttendance, WorkLocation};
use crate::model::employee::{Employee, EmployeeStatus};
use crate::model::leave::{LeaveRecord, LeaveStatus, LeaveType, NewLeave};
use crate::model::work_report::{NewWorkReport, WorkReport};

// Helper enum for typed SQLx binding
enum FilterValue {
    U64(u64),
    Date(NaiveDate),
    Str(&'static str),
    Text(String),
}

fn bind_all<'q, O>(
    mut query: QueryAs<'q, MySql, O, MySqlArguments>,
    args: Vec<FilterValue>,
) -> QueryAs<'q, MySql, O, MySqlArguments> {
    for arg in args {
        query = match arg {
            FilterValue::U64(v) => query.bind(v),
            FilterValue::Date(v) => query.bind(v),
            FilterValue::Str(v) => query.bind(v),
            FilterValue::Text(v) => query.bind(v),
        };
    }
    query
}

fn decode<T: FromStr>(table: &'static str, id: u64, column: &str, raw: &str) -> Result<T, StoreError> {
    T::from_str(raw).map_err(|_| StoreError::Decode {
        table,
        id,
        detail: format!("unexpected {} '{}'", column, raw),
    })
}

#[derive(FromRow)]
struct EmployeeRow {
    id: u64,
    name: String,
    email: Option<String>,
    department: String,
    position: String,
    status: String,
    join_date: NaiveDate,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = StoreError;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        Ok(Employee {
            status: decode("employees", row.id, "status", &row.status)?,
            id: row.id,
            name: row.name,
            email: row.email,
            department: row.department,
            position: row.position,
            join_date: row.join_date,
        })
    }
}

#[derive(FromRow)]
struct AttendanceRow {
    id: u64,
    employee_id: u64,
    date: NaiveDate,
    check_in: Option<NaiveTime>,
    check_out: Option<NaiveTime>,
    work_hr: Option<String>,
    status: String,
    location: String,
    site_name: Option<String>,
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = StoreError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        Ok(AttendanceRecord {
            status: decode::<AttendanceStatus>("attendance", row.id, "status", &row.status)?,
            location: decode::<WorkLocation>("attendance", row.id, "location", &row.location)?,
            id: row.id,
            employee_id: row.employee_id,
            date: row.date,
            check_in: row.check_in,
            check_out: row.check_out,
            work_hr: row.work_hr,
            site_name: row.site_name,
        })
    }
}

#[derive(FromRow)]
struct LeaveRow {
    id: u64,
    employee_id: u64,
    leave_type: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    number_of_days: u32,
    status: String,
    reason: String,
}

impl TryFrom<LeaveRow> for LeaveRecord {
    type Error = StoreError;

    fn try_from(row: LeaveRow) -> Result<Self, Self::Error> {
        Ok(LeaveRecord {
            leave_type: decode::<LeaveType>("leaves", row.id, "leave_type", &row.leave_type)?,
            status: decode::<LeaveStatus>("leaves", row.id, "status", &row.status)?,
            id: row.id,
            employee_id: row.employee_id,
            start_date: row.start_date,
            end_date: row.end_date,
            number_of_days: row.number_of_days,
            reason: row.reason,
        })
    }
}

#[derive(FromRow)]
struct WorkReportRow {
    id: u64,
    date: NaiveDate,
    customer_name: String,
    location: Option<String>,
    purpose: Option<String>,
    in_time: Option<NaiveTime>,
    out_time: Option<NaiveTime>,
    issue: Option<String>,
    machine_system: Option<String>,
    reported_by: Option<String>,
    action_taken: Option<String>,
    status: Option<String>,
    task: Option<String>,
    action_required: Option<String>,
    remark: Option<String>,
    part_number: Option<String>,
    serial_number: Option<String>,
    qty: Option<u32>,
    additional_note: Option<String>,
    prepared_by: Option<String>,
    submitted_to: Option<String>,
}

impl From<WorkReportRow> for WorkReport {
    fn from(row: WorkReportRow) -> Self {
        WorkReport {
            id: row.id,
            date: row.date,
            customer_name: row.customer_name,
            location: row.location,
            purpose: row.purpose,
            in_time: row.in_time,
            out_time: row.out_time,
            issue: row.issue,
            machine_system: row.machine_system,
            reported_by: row.reported_by,
            action_taken: row.action_taken,
            status: row.status,
            task: row.task,
            action_required: row.action_required,
            remark: row.remark,
            part_number: row.part_number,
            serial_number: row.serial_number,
            qty: row.qty,
            additional_note: row.additional_note,
            prepared_by: row.prepared_by,
            submitted_to: row.submitted_to,
        }
    }
}

const WORK_REPORT_COLUMNS: &str = "id, date, customer_name, location, purpose, in_time, out_time, \
     issue, machine_system, reported_by, action_taken, status, task, action_required, remark, \
     part_number, serial_number, qty, additional_note, prepared_by, submitted_to";

const ATTENDANCE_COLUMNS: &str =
    "id, employee_id, date, check_in, check_out, work_hr, status, location, site_name";
const LEAVE_COLUMNS: &str =
    "id, employee_id, leave_type, start_date, end_date, number_of_days, status, reason";

/// MySQL-backed store; tables are described in `schema.sql`.
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for MySqlStore {
    async fn employees(&self, status: Option<EmployeeStatus>) -> Result<Vec<Employee>, StoreError> {
        let mut sql = String::from(
            "SELECT id, name, email, department, position, status, join_date FROM employees WHERE 1=1",
        );
        let mut args = Vec::new();
        if let Some(status) = status {
            sql.push_str(" AND status = ?");
            args.push(FilterValue::Str(status.into()));
        }
        sql.push_str(" ORDER BY id ASC");

        let rows = bind_all(sqlx::query_as::<_, EmployeeRow>(&sql), args)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Employee::try_from).collect()
    }

    async fn list_attendance(&self, scan: &AttendanceScan) -> Result<Vec<AttendanceRecord>, StoreError> {
        let mut sql = format!("SELECT {} FROM attendance WHERE 1=1", ATTENDANCE_COLUMNS);
        let mut args = Vec::new();

        if let Some(id) = scan.employee_id {
            sql.push_str(" AND employee_id = ?");
            args.push(FilterValue::U64(id));
        }
        if let Some(from) = scan.from {
            sql.push_str(" AND date >= ?");
            args.push(FilterValue::Date(from));
        }
        if let Some(until) = scan.until {
            sql.push_str(" AND date < ?");
            args.push(FilterValue::Date(until));
        }
        sql.push_str(" ORDER BY id ASC");

        tracing::debug!(sql = %sql, "Scanning attendance");
        let rows = bind_all(sqlx::query_as::<_, AttendanceRow>(&sql), args)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(AttendanceRecord::try_from).collect()
    }

    async fn get_attendance(&self, id: u64) -> Result<Option<AttendanceRecord>, StoreError> {
        let sql = format!("SELECT {} FROM attendance WHERE id = ?", ATTENDANCE_COLUMNS);
        sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(AttendanceRecord::try_from)
            .transpose()
    }

    async fn insert_attendance(&self, new: NewAttendance) -> Result<AttendanceRecord, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance
                (employee_id, date, check_in, check_out, work_hr, status, location, site_name)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.employee_id)
        .bind(new.date)
        .bind(new.check_in)
        .bind(new.check_out)
        .bind(new.work_hr.as_deref())
        .bind(new.status.as_ref())
        .bind(new.location.as_ref())
        .bind(new.site_name.as_deref())
        .execute(&self.pool)
        .await?;

        Ok(new.into_record(result.last_insert_id()))
    }

    async fn update_attendance(&self, record: &AttendanceRecord) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE attendance
            SET check_in = ?, check_out = ?, work_hr = ?, status = ?, location = ?, site_name = ?
            WHERE id = ?
            "#,
        )
        .bind(record.check_in)
        .bind(record.check_out)
        .bind(record.work_hr.as_deref())
        .bind(record.status.as_ref())
        .bind(record.location.as_ref())
        .bind(record.site_name.as_deref())
        .bind(record.id)
        .execute(&self.pool)
        .await?;

        // MySQL reports zero affected rows for a no-op update, so confirm existence.
        if result.rows_affected() > 0 {
            return Ok(true);
        }
        Ok(self.get_attendance(record.id).await?.is_some())
    }

    async fn delete_attendance(&self, id: u64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM attendance WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_leaves(&self, scan: &LeaveScan) -> Result<Vec<LeaveRecord>, StoreError> {
        let mut sql = format!("SELECT {} FROM leaves WHERE 1=1", LEAVE_COLUMNS);
        let mut args = Vec::new();

        if let Some(id) = scan.employee_id {
            sql.push_str(" AND employee_id = ?");
            args.push(FilterValue::U64(id));
        }
        if let Some(status) = scan.status {
            sql.push_str(" AND status = ?");
            args.push(FilterValue::Str(status.into()));
        }
        if let Some((from, to)) = scan.overlapping {
            sql.push_str(" AND start_date <= ? AND end_date >= ?");
            args.push(FilterValue::Date(to));
            args.push(FilterValue::Date(from));
        }
        sql.push_str(" ORDER BY id ASC");

        tracing::debug!(sql = %sql, "Scanning leaves");
        let rows = bind_all(sqlx::query_as::<_, LeaveRow>(&sql), args)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(LeaveRecord::try_from).collect()
    }

    async fn get_leave(&self, id: u64) -> Result<Option<LeaveRecord>, StoreError> {
        let sql = format!("SELECT {} FROM leaves WHERE id = ?", LEAVE_COLUMNS);
        sqlx::query_as::<_, LeaveRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(LeaveRecord::try_from)
            .transpose()
    }

    async fn insert_leave(&self, new: NewLeave) -> Result<LeaveRecord, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO leaves
                (employee_id, leave_type, start_date, end_date, number_of_days, status, reason)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.employee_id)
        .bind(new.leave_type.as_ref())
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(new.number_of_days)
        .bind(new.status.as_ref())
        .bind(new.reason.as_str())
        .execute(&self.pool)
        .await?;

        Ok(new.into_record(result.last_insert_id()))
    }

    async fn update_leave(&self, record: &LeaveRecord) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE leaves
            SET employee_id = ?, leave_type = ?, start_date = ?, end_date = ?,
                number_of_days = ?, status = ?, reason = ?
            WHERE id = ?
            "#,
        )
        .bind(record.employee_id)
        .bind(record.leave_type.as_ref())
        .bind(record.start_date)
        .bind(record.end_date)
        .bind(record.number_of_days)
        .bind(record.status.as_ref())
        .bind(record.reason.as_str())
        .bind(record.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }
        Ok(self.get_leave(record.id).await?.is_some())
    }

    async fn delete_leave(&self, id: u64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM leaves WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn transition_leave(
        &self,
        id: u64,
        from: LeaveStatus,
        to: LeaveStatus,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE leaves SET status = ? WHERE id = ? AND status = ?")
            .bind(to.as_ref())
            .bind(id)
            .bind(from.as_ref())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, leave_id = id, "Leave status transition failed");
                e
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_work_reports(&self, scan: &WorkReportScan) -> Result<Vec<WorkReport>, StoreError> {
        let mut sql = format!("SELECT {} FROM work_reports WHERE 1=1", WORK_REPORT_COLUMNS);
        let mut args = Vec::new();

        if let Some(author) = &scan.prepared_by {
            sql.push_str(" AND prepared_by = ?");
            args.push(FilterValue::Text(author.clone()));
        }
        if let Some(from) = scan.from {
            sql.push_str(" AND date >= ?");
            args.push(FilterValue::Date(from));
        }
        if let Some(to) = scan.to {
            sql.push_str(" AND date <= ?");
            args.push(FilterValue::Date(to));
        }
        sql.push_str(" ORDER BY date DESC, id DESC");

        tracing::debug!(sql = %sql, "Scanning work reports");
        let rows = bind_all(sqlx::query_as::<_, WorkReportRow>(&sql), args)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(WorkReport::from).collect())
    }

    async fn insert_work_report(&self, new: NewWorkReport) -> Result<WorkReport, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO work_reports
                (date, customer_name, location, purpose, in_time, out_time, issue, machine_system,
                 reported_by, action_taken, status, task, action_required, remark, part_number,
                 serial_number, qty, additional_note, prepared_by, submitted_to)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.date)
        .bind(new.customer_name.as_str())
        .bind(new.location.as_deref())
        .bind(new.purpose.as_deref())
        .bind(new.in_time)
        .bind(new.out_time)
        .bind(new.issue.as_deref())
        .bind(new.machine_system.as_deref())
        .bind(new.reported_by.as_deref())
        .bind(new.action_taken.as_deref())
        .bind(new.status.as_deref())
        .bind(new.task.as_deref())
        .bind(new.action_required.as_deref())
        .bind(new.remark.as_deref())
        .bind(new.part_number.as_deref())
        .bind(new.serial_number.as_deref())
        .bind(new.qty)
        .bind(new.additional_note.as_deref())
        .bind(new.prepared_by.as_deref())
        .bind(new.submitted_to.as_deref())
        .execute(&self.pool)
        .await?;

        Ok(new.into_report(result.last_insert_id()))
    }

    async fn work_report_authors(&self) -> Result<Vec<String>, StoreError> {
        let authors = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT prepared_by FROM work_reports \
             WHERE prepared_by IS NOT NULL AND prepared_by <> '' ORDER BY prepared_by ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(authors)
    }
}
