use actix_web::{HttpResponse, web};
use serde::Deserialize;
use utoipa::IntoParams;

use super::{attendance, leave, required};
use crate::accounting::filter::{EmployeeFilter, NameMatch};
use crate::accounting::monthly::{MonthlyReport, ReportWindow, monthly_summary};
use crate::config::Config;
use crate::error::AppError;
use crate::store::Store;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MonthlyQuery {
    /// Reporting month (YYYY-MM)
    #[param(example = "2025-10")]
    pub month: Option<String>,
    /// Substring of the employee name, or `all`
    #[param(example = "all")]
    pub employee: Option<String>,
    /// Emit zero rows for employees with no activity in the month
    pub include_zero: Option<bool>,
}

/// Monthly attendance summary
#[utoipa::path(
    get,
    path = "/api/attendance/reports/monthly",
    params(MonthlyQuery),
    responses(
        (status = 200, description = "One row per active employee", body = [crate::model::report::MonthlySummaryRow]),
        (status = 400, description = "Month missing or malformed", body = Object, example = json!({
            "success": false,
            "message": "Month is required"
        }))
    ),
    tag = "Reports"
)]
pub async fn monthly_report(
    store: web::Data<dyn Store>,
    config: web::Data<Config>,
    query: web::Query<MonthlyQuery>,
) -> Result<HttpResponse, AppError> {
    let month = required(query.month.as_deref(), "Month is required")?;
    let report = MonthlyReport {
        window: ReportWindow::parse_month(month)?,
        employee: EmployeeFilter::parse(query.employee.as_deref(), NameMatch::Substring),
        include_zero_activity_employees: query.include_zero.unwrap_or(config.include_zero_activity),
    };

    let rows = monthly_summary(store.get_ref(), &report).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// Attendance rows for export
#[utoipa::path(
    get,
    path = "/api/attendance/reports/export",
    params(attendance::AttendanceFilter),
    responses(
        (status = 200, description = "Matching attendance rows; empty when nothing matches", body = [attendance::AttendanceView]),
        (status = 400, description = "Invalid status filter")
    ),
    tag = "Reports"
)]
pub async fn export_attendance(
    store: web::Data<dyn Store>,
    query: web::Query<attendance::AttendanceFilter>,
) -> Result<HttpResponse, AppError> {
    let query = query.to_query(NameMatch::Substring)?;
    let rows = attendance::filtered_views(store.get_ref(), &query).await?;
    tracing::debug!(rows = rows.len(), "Attendance export");
    Ok(HttpResponse::Ok().json(rows))
}

/// Leave rows for export
#[utoipa::path(
    get,
    path = "/api/leave/reports/export",
    params(leave::LeaveFilter),
    responses(
        (status = 200, description = "Matching leave rows; empty when nothing matches", body = [leave::LeaveView]),
        (status = 400, description = "Invalid status or leave type filter")
    ),
    tag = "Reports"
)]
pub async fn export_leaves(
    store: web::Data<dyn Store>,
    query: web::Query<leave::LeaveFilter>,
) -> Result<HttpResponse, AppError> {
    let query = query.to_query(NameMatch::Substring)?;
    let rows = leave::filtered_views(store.get_ref(), &query).await?;
    tracing::debug!(rows = rows.len(), "Leave export");
    Ok(HttpResponse::Ok().json(rows))
}
