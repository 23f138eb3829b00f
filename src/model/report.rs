use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One employee's attendance facts for a reporting window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "employee": "Amara Okafor",
    "present": 18,
    "absent": 1,
    "leave": 2,
    "percentage": "85.7"
}))]
pub struct MonthlySummaryRow {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Amara Okafor")]
    pub employee: String,
    pub present: u32,
    pub absent: u32,
    pub leave: u32,
    /// Attendance percentage rendered with one decimal.
    #[schema(example = "85.7")]
    pub percentage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "totalEmployees": 12,
    "totalPresent": 9,
    "totalLeave": 1,
    "totalAbsent": 2,
    "date": "2025-10-06"
}))]
pub struct DailyDashboard {
    pub total_employees: u32,
    pub total_present: u32,
    pub total_leave: u32,
    pub total_absent: u32,
    #[schema(example = "2025-10-06", format = "date")]
    pub date: String,
}
