use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString, IntoStaticStr};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, EnumString, AsRefStr, IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum EmployeeStatus {
    Active,
    Inactive,
}

/// Directory entry as seen by the attendance core. Owned by the employee
/// directory; never mutated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Amara Okafor",
        "email": "amara@company.com",
        "department": "Engineering",
        "position": "Site Engineer",
        "status": "ACTIVE",
        "joinDate": "2024-01-01"
    })
)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Amara Okafor")]
    pub name: String,

    #[schema(example = "amara@company.com", nullable = true)]
    pub email: Option<String>,

    #[schema(example = "Engineering")]
    pub department: String,

    #[schema(example = "Site Engineer")]
    pub position: String,

    pub status: EmployeeStatus,

    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub join_date: NaiveDate,
}

impl Employee {
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }
}
