use crate::api::attendance::{AttendanceView, CreateAttendance, UpdateAttendance};
use crate::api::leave::{LeavePayload, LeaveView};
use crate::api::work_report::CreateWorkReport;
use crate::model::attendance::{AttendanceStatus, WorkLocation};
use crate::model::employee::{Employee, EmployeeStatus};
use crate::model::leave::{LeaveStatus, LeaveType};
use crate::model::report::{DailyDashboard, MonthlySummaryRow};
use crate::model::work_report::WorkReport;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Attendance API",
        version = "0.1.0",
        description = r#"
## Attendance & Leave Accounting

Back office API for recording daily attendance and leave, and for the reports built on them.

### 🔹 Key Features
- **Attendance**
  - Record check-in/check-out; work duration and status are derived from the times
  - Correct or delete a record; status is re-derived on every correction
- **Leave**
  - Apply for leave, edit, approve or reject pending requests
- **Reports**
  - Monthly summary per active employee with an attendance percentage
  - Filtered attendance and leave exports
- **Work Reports**
  - File field-service visit reports; list by date range and author
- **Dashboard**
  - Present / on leave / absent counts for today

### 📦 Response Format
- JSON-based RESTful responses
- Errors carry `{ "success": false, "message": ... }`

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::create_attendance,
        crate::api::attendance::list_attendance,
        crate::api::attendance::get_attendance,
        crate::api::attendance::update_attendance,
        crate::api::attendance::delete_attendance,

        crate::api::leave::create_leave,
        crate::api::leave::list_leaves,
        crate::api::leave::get_leave,
        crate::api::leave::update_leave,
        crate::api::leave::delete_leave,
        crate::api::leave::approve_leave,
        crate::api::leave::reject_leave,

        crate::api::report::monthly_report,
        crate::api::report::export_attendance,
        crate::api::report::export_leaves,

        crate::api::work_report::create_work_report,
        crate::api::work_report::list_work_reports,
        crate::api::work_report::list_authors,

        crate::api::dashboard::get_dashboard,
        crate::api::employee::list_employees
    ),
    components(
        schemas(
            CreateAttendance,
            UpdateAttendance,
            AttendanceView,
            AttendanceStatus,
            WorkLocation,
            LeavePayload,
            LeaveView,
            LeaveStatus,
            LeaveType,
            MonthlySummaryRow,
            DailyDashboard,
            Employee,
            EmployeeStatus,
            CreateWorkReport,
            WorkReport
        )
    ),
    tags(
        (name = "Attendance", description = "Attendance recording and correction"),
        (name = "Leave", description = "Leave applications and review"),
        (name = "Reports", description = "Monthly summary and exports"),
        (name = "Work Report", description = "Field-service visit reports"),
        (name = "Dashboard", description = "Today's headcount"),
        (name = "Employee", description = "Read-only employee directory"),
    )
)]
pub struct ApiDoc;
