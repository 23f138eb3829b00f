use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum AttendanceStatus {
    Present,
    HalfDay,
    Absent,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, EnumString, AsRefStr, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum WorkLocation {
    Office,
    Site,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: u64,
    pub employee_id: u64,
    pub date: NaiveDate,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    /// Display form of the worked duration, e.g. `9hr 0m`.
    pub work_hr: Option<String>,
    pub status: AttendanceStatus,
    pub location: WorkLocation,
    pub site_name: Option<String>,
}

/// Attendance row ready to be persisted; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttendance {
    pub employee_id: u64,
    pub date: NaiveDate,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub work_hr: Option<String>,
    pub status: AttendanceStatus,
    pub location: WorkLocation,
    pub site_name: Option<String>,
}

impl NewAttendance {
    pub fn into_record(self, id: u64) -> AttendanceRecord {
        AttendanceRecord {
            id,
            employee_id: self.employee_id,
            date: self.date,
            check_in: self.check_in,
            check_out: self.check_out,
            work_hr: self.work_hr,
            status: self.status,
            location: self.location,
            site_name: self.site_name,
        }
    }
}

/// Site name is only meaningful away from the office.
pub fn site_name_for(location: WorkLocation, site_name: Option<String>) -> Option<String> {
    match location {
        WorkLocation::Office => None,
        WorkLocation::Site => site_name.filter(|s| !s.trim().is_empty()),
    }
}
