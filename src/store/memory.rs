use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use super::{AttendanceScan, LeaveScan, Store, StoreError, WorkReportScan};
use crate::model::attendance::{AttendanceRecord, NewAttendance};
use crate::model::employee::{Employee, EmployeeStatus};
use crate::model::leave::{LeaveRecord, LeaveStatus, NewLeave};
use crate::model::work_report::{NewWorkReport, WorkReport};

#[derive(Default)]
struct Tables {
    employees: BTreeMap<u64, Employee>,
    attendance: BTreeMap<u64, AttendanceRecord>,
    leaves: BTreeMap<u64, LeaveRecord>,
    work_reports: BTreeMap<u64, WorkReport>,
    next_attendance_id: u64,
    next_leave_id: u64,
    next_work_report_id: u64,
}

/// Process-local store backed by ordered maps. Used by tests and by the
/// `memory` backend for demos.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_employees(employees: Vec<Employee>) -> Self {
        let tables = Tables {
            employees: employees.into_iter().map(|e| (e.id, e)).collect(),
            ..Tables::default()
        };
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Loads a JSON array of employees as the read-only directory.
    pub fn from_seed_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let employees: Vec<Employee> = serde_json::from_str(&raw)?;
        tracing::info!(
            employees = employees.len(),
            path = %path.display(),
            "Employee seed loaded"
        );
        Ok(Self::with_employees(employees))
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables.write().map_err(|_| StoreError::Poisoned)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn employees(&self, status: Option<EmployeeStatus>) -> Result<Vec<Employee>, StoreError> {
        let tables = self.read()?;
        Ok(tables
            .employees
            .values()
            .filter(|e| status.is_none_or(|s| e.status == s))
            .cloned()
            .collect())
    }

    async fn list_attendance(&self, scan: &AttendanceScan) -> Result<Vec<AttendanceRecord>, StoreError> {
        let tables = self.read()?;
        Ok(tables
            .attendance
            .values()
            .filter(|r| scan.matches(r))
            .cloned()
            .collect())
    }

    async fn get_attendance(&self, id: u64) -> Result<Option<AttendanceRecord>, StoreError> {
        Ok(self.read()?.attendance.get(&id).cloned())
    }

    async fn insert_attendance(&self, new: NewAttendance) -> Result<AttendanceRecord, StoreError> {
        let mut tables = self.write()?;
        tables.next_attendance_id += 1;
        let record = new.into_record(tables.next_attendance_id);
        tables.attendance.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_attendance(&self, record: &AttendanceRecord) -> Result<bool, StoreError> {
        let mut tables = self.write()?;
        match tables.attendance.get_mut(&record.id) {
            Some(slot) => {
                *slot = record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_attendance(&self, id: u64) -> Result<bool, StoreError> {
        Ok(self.write()?.attendance.remove(&id).is_some())
    }

    async fn list_leaves(&self, scan: &LeaveScan) -> Result<Vec<LeaveRecord>, StoreError> {
        let tables = self.read()?;
        Ok(tables
            .leaves
            .values()
            .filter(|l| scan.matches(l))
            .cloned()
            .collect())
    }

    async fn get_leave(&self, id: u64) -> Result<Option<LeaveRecord>, StoreError> {
        Ok(self.read()?.leaves.get(&id).cloned())
    }

    async fn insert_leave(&self, new: NewLeave) -> Result<LeaveRecord, StoreError> {
        let mut tables = self.write()?;
        tables.next_leave_id += 1;
        let record = new.into_record(tables.next_leave_id);
        tables.leaves.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_leave(&self, record: &LeaveRecord) -> Result<bool, StoreError> {
        let mut tables = self.write()?;
        match tables.leaves.get_mut(&record.id) {
            Some(slot) => {
                *slot = record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_leave(&self, id: u64) -> Result<bool, StoreError> {
        Ok(self.write()?.leaves.remove(&id).is_some())
    }

    async fn transition_leave(
        &self,
        id: u64,
        from: LeaveStatus,
        to: LeaveStatus,
    ) -> Result<bool, StoreError> {
        let mut tables = self.write()?;
        match tables.leaves.get_mut(&id) {
            Some(leave) if leave.status == from => {
                leave.status = to;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_work_reports(&self, scan: &WorkReportScan) -> Result<Vec<WorkReport>, StoreError> {
        let tables = self.read()?;
        let mut reports: Vec<WorkReport> = tables
            .work_reports
            .values()
            .filter(|r| scan.matches(r))
            .cloned()
            .collect();
        reports.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(reports)
    }

    async fn insert_work_report(&self, new: NewWorkReport) -> Result<WorkReport, StoreError> {
        let mut tables = self.write()?;
        tables.next_work_report_id += 1;
        let report = new.into_report(tables.next_work_report_id);
        tables.work_reports.insert(report.id, report.clone());
        Ok(report)
    }

    async fn work_report_authors(&self) -> Result<Vec<String>, StoreError> {
        let tables = self.read()?;
        let authors: BTreeSet<String> = tables
            .work_reports
            .values()
            .filter_map(|r| r.prepared_by.clone())
            .filter(|name| !name.trim().is_empty())
            .collect();
        Ok(authors.into_iter().collect())
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::model::attendance::AttendanceStatus;

    #[actix_web::test]
    async fn duplicate_attendance_for_same_day_is_kept() {
        let store = MemoryStore::with_employees(roster());
        let a = store
            .insert_attendance(attendance(1, "2025-10-01", AttendanceStatus::Present))
            .await
            .unwrap();
        let b = store
            .insert_attendance(attendance(1, "2025-10-01", AttendanceStatus::Present))
            .await
            .unwrap();
        assert_ne!(a.id, b.id);
        let all = store.list_attendance(&AttendanceScan::default()).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[actix_web::test]
    async fn attendance_scan_is_half_open() {
        let store = MemoryStore::new();
        for day in ["2025-09-30", "2025-10-01", "2025-10-31", "2025-11-01"] {
            store
                .insert_attendance(attendance(1, day, AttendanceStatus::Present))
                .await
                .unwrap();
        }
        let scan = AttendanceScan {
            employee_id: Some(1),
            from: Some(date("2025-10-01")),
            until: Some(date("2025-11-01")),
        };
        let days: Vec<_> = store
            .list_attendance(&scan)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.date)
            .collect();
        assert_eq!(days, vec![date("2025-10-01"), date("2025-10-31")]);
    }

    #[actix_web::test]
    async fn update_and_delete_report_missing_ids() {
        let store = MemoryStore::new();
        let mut record = store
            .insert_attendance(attendance(1, "2025-10-01", AttendanceStatus::Absent))
            .await
            .unwrap();
        record.status = AttendanceStatus::Present;
        assert!(store.update_attendance(&record).await.unwrap());
        assert_eq!(
            store.get_attendance(record.id).await.unwrap().unwrap().status,
            AttendanceStatus::Present
        );
        assert!(store.delete_attendance(record.id).await.unwrap());
        assert!(!store.delete_attendance(record.id).await.unwrap());
        assert!(!store.update_attendance(&record).await.unwrap());
    }

    #[actix_web::test]
    async fn leave_transition_only_from_expected_state() {
        let store = MemoryStore::new();
        let leave = store
            .insert_leave(leave(1, "2025-10-01", "2025-10-02", LeaveStatus::Pending))
            .await
            .unwrap();
        assert!(
            store
                .transition_leave(leave.id, LeaveStatus::Pending, LeaveStatus::Approved)
                .await
                .unwrap()
        );
        assert!(
            !store
                .transition_leave(leave.id, LeaveStatus::Pending, LeaveStatus::Rejected)
                .await
                .unwrap()
        );
    }

    #[actix_web::test]
    async fn employees_filter_by_status() {
        let store = MemoryStore::with_employees(roster());
        let active = store.employees(Some(EmployeeStatus::Active)).await.unwrap();
        assert_eq!(active.len(), 3);
        assert_eq!(store.employees(None).await.unwrap().len(), 4);
    }

    #[actix_web::test]
    async fn seed_file_loads_directory() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("seed/employees.json");
        let store = MemoryStore::from_seed_file(&path).unwrap();
        let active = store.employees(Some(EmployeeStatus::Active)).await.unwrap();
        let names: Vec<_> = active.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Amara Okafor", "Samuel Reyes"]);
    }

    #[actix_web::test]
    async fn work_reports_newest_first_with_inclusive_range() {
        let store = MemoryStore::new();
        for (day, author) in [
            ("2025-10-01", Some("Samuel")),
            ("2025-10-07", Some("Amara")),
            ("2025-10-07", Some("Samuel")),
            ("2025-10-08", None),
        ] {
            store
                .insert_work_report(work_report(day, "Harbour Logistics", author))
                .await
                .unwrap();
        }

        let all = store.list_work_reports(&WorkReportScan::default()).await.unwrap();
        let ids: Vec<u64> = all.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![4, 3, 2, 1]);

        let scan = WorkReportScan {
            prepared_by: Some("Samuel".to_string()),
            from: Some(date("2025-10-01")),
            to: Some(date("2025-10-07")),
        };
        let ids: Vec<u64> = store
            .list_work_reports(&scan)
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![3, 1]);

        assert_eq!(
            store.work_report_authors().await.unwrap(),
            vec!["Amara".to_string(), "Samuel".to_string()]
        );
    }
}
