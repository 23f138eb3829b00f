use std::collections::HashMap;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use strum::IntoEnumIterator;

use crate::error::AppError;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::employee::Employee;
use crate::model::leave::{LeaveRecord, LeaveStatus, LeaveType};
use crate::store::{AttendanceScan, LeaveScan};

const WILDCARD: &str = "all";

/// `None`, blank and `"all"` (any case) mean "no filter".
pub fn is_wildcard(raw: Option<&str>) -> bool {
    match raw.map(str::trim) {
        None | Some("") => true,
        Some(v) => v.eq_ignore_ascii_case(WILDCARD),
    }
}

/// How an employee-name filter compares against the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatch {
    /// Case-insensitive substring; report and export filtering.
    Substring,
    /// Case-insensitive equality; list views.
    ExactIgnoreCase,
    /// Case-sensitive equality; resolving a typed name to an employee id.
    Exact,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeFilter {
    pattern: Option<String>,
    mode: NameMatch,
}

impl EmployeeFilter {
    pub fn parse(raw: Option<&str>, mode: NameMatch) -> Self {
        let pattern = if is_wildcard(raw) {
            None
        } else {
            raw.map(|s| s.trim().to_string())
        };
        Self { pattern, mode }
    }

    pub fn is_wildcard(&self) -> bool {
        self.pattern.is_none()
    }

    pub fn matches_name(&self, name: &str) -> bool {
        let Some(pattern) = self.pattern.as_deref() else {
            return true;
        };
        match self.mode {
            NameMatch::Substring => name.to_lowercase().contains(&pattern.to_lowercase()),
            NameMatch::ExactIgnoreCase => name.to_lowercase() == pattern.to_lowercase(),
            NameMatch::Exact => name == pattern,
        }
    }

    pub fn matches(&self, employee: &Employee) -> bool {
        self.matches_name(&employee.name)
    }
}

/// Exact match against one of the enumerated values of `S`, or a wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumFilter<S>(Option<S>);

impl<S> EnumFilter<S>
where
    S: FromStr + IntoEnumIterator + AsRef<str> + PartialEq + Copy,
{
    pub fn parse(raw: Option<&str>, field: &str) -> Result<Self, AppError> {
        if is_wildcard(raw) {
            return Ok(Self(None));
        }
        let raw = raw.unwrap_or_default().trim();
        S::from_str(raw).map(|v| Self(Some(v))).map_err(|_| {
            let allowed: Vec<String> = S::iter().map(|v| v.as_ref().to_string()).collect();
            AppError::validation(format!(
                "Invalid {} '{}'. Allowed: {}, all",
                field,
                raw,
                allowed.join(", ")
            ))
        })
    }

    pub fn value(&self) -> Option<S> {
        self.0
    }

    pub fn matches(&self, value: S) -> bool {
        self.0.is_none_or(|wanted| wanted == value)
    }
}

/// `[00:00:00.000, 23:59:59.999]` of a calendar day.
pub fn day_bounds(day: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let end = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    (day.and_time(NaiveTime::MIN), day.and_time(end))
}

/// Names for employee ids, with a placeholder for records whose employee is
/// no longer in the directory.
#[derive(Debug, Default, Clone)]
pub struct Directory {
    by_id: HashMap<u64, Employee>,
}

impl Directory {
    pub const UNKNOWN: &'static str = "Unknown";

    pub fn new(employees: Vec<Employee>) -> Self {
        Self {
            by_id: employees.into_iter().map(|e| (e.id, e)).collect(),
        }
    }

    pub fn name_of(&self, id: u64) -> &str {
        self.by_id.get(&id).map_or(Self::UNKNOWN, |e| e.name.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct AttendanceQuery {
    pub day: Option<NaiveDate>,
    pub employee: EmployeeFilter,
    pub status: EnumFilter<AttendanceStatus>,
}

impl AttendanceQuery {
    pub fn parse(
        day: Option<NaiveDate>,
        employee: Option<&str>,
        status: Option<&str>,
        mode: NameMatch,
    ) -> Result<Self, AppError> {
        Ok(Self {
            day,
            employee: EmployeeFilter::parse(employee, mode),
            status: EnumFilter::parse(status, "status")?,
        })
    }

    /// Coarse predicate the store can evaluate on its own.
    pub fn scan(&self) -> AttendanceScan {
        AttendanceScan {
            employee_id: None,
            from: self.day,
            until: self.day.and_then(|d| d.succ_opt()),
        }
    }

    pub fn matches(&self, record: &AttendanceRecord, employee_name: &str) -> bool {
        let on_day = self.day.is_none_or(|day| {
            let (start, end) = day_bounds(day);
            let at = record.date.and_time(NaiveTime::MIN);
            start <= at && at <= end
        });
        on_day && self.status.matches(record.status) && self.employee.matches_name(employee_name)
    }

    pub fn apply(&self, records: Vec<AttendanceRecord>, directory: &Directory) -> Vec<AttendanceRecord> {
        records
            .into_iter()
            .filter(|r| self.matches(r, directory.name_of(r.employee_id)))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct LeaveQuery {
    /// Inclusive `[from, to]`; only set when both bounds were given.
    pub range: Option<(NaiveDate, NaiveDate)>,
    pub employee: EmployeeFilter,
    pub status: EnumFilter<LeaveStatus>,
    pub leave_type: EnumFilter<LeaveType>,
}

impl LeaveQuery {
    pub fn parse(
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        employee: Option<&str>,
        status: Option<&str>,
        leave_type: Option<&str>,
        mode: NameMatch,
    ) -> Result<Self, AppError> {
        Ok(Self {
            range: from.zip(to),
            employee: EmployeeFilter::parse(employee, mode),
            status: EnumFilter::parse(status, "status")?,
            leave_type: EnumFilter::parse(leave_type, "leave type")?,
        })
    }

    pub fn scan(&self) -> LeaveScan {
        LeaveScan {
            employee_id: None,
            status: self.status.value(),
            overlapping: self.range,
        }
    }

    pub fn matches(&self, leave: &LeaveRecord, employee_name: &str) -> bool {
        let in_range = self
            .range
            .is_none_or(|(from, to)| leave.start_date <= to && leave.end_date >= from);
        in_range
            && self.status.matches(leave.status)
            && self.leave_type.matches(leave.leave_type)
            && self.employee.matches_name(employee_name)
    }

    pub fn apply(&self, leaves: Vec<LeaveRecord>, directory: &Directory) -> Vec<LeaveRecord> {
        leaves
            .into_iter()
            .filter(|l| self.matches(l, directory.name_of(l.employee_id)))
            .collect()
    }
}

/// Resolves a typed employee name to a directory entry. Case-sensitive, first
/// match wins.
pub fn resolve_employee<'a>(employees: &'a [Employee], name: &str) -> Result<&'a Employee, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Employee name is required"));
    }
    let filter = EmployeeFilter::parse(Some(name), NameMatch::Exact);
    employees
        .iter()
        .find(|e| filter.matches(e))
        .ok_or_else(|| AppError::EmployeeNotFound(name.to_string()))
}
