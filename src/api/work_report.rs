use actix_web::{HttpResponse, web};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use super::required;
use crate::accounting::filter::is_wildcard;
use crate::error::AppError;
use crate::model::work_report::{NewWorkReport, WorkReport, clock};
use crate::store::{Store, WorkReportScan};

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkReport {
    #[schema(example = "2025-10-06", format = "date", value_type = String)]
    pub date: Option<NaiveDate>,
    #[schema(example = "Harbour Logistics")]
    pub customer_name: Option<String>,
    pub location: Option<String>,
    #[schema(example = "Maintenance")]
    pub purpose: Option<String>,
    #[schema(value_type = Option<String>, example = "10:15")]
    #[serde(default, with = "clock")]
    pub in_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>, example = "12:40")]
    #[serde(default, with = "clock")]
    pub out_time: Option<NaiveTime>,
    pub issue: Option<String>,
    pub machine_system: Option<String>,
    pub reported_by: Option<String>,
    pub action_taken: Option<String>,
    #[schema(example = "Completed")]
    pub status: Option<String>,
    pub task: Option<String>,
    pub action_required: Option<String>,
    pub remark: Option<String>,
    pub part_number: Option<String>,
    pub serial_number: Option<String>,
    pub qty: Option<u32>,
    pub additional_note: Option<String>,
    #[schema(example = "Amara Okafor")]
    pub prepared_by: Option<String>,
    pub submitted_to: Option<String>,
}

/// Blank form fields are stored as absent.
fn text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl CreateWorkReport {
    fn into_new(self) -> Result<NewWorkReport, AppError> {
        const MISSING: &str = "Date and customer name are required";
        let customer_name = required(self.customer_name.as_deref(), MISSING)?.to_string();
        let date = self.date.ok_or_else(|| AppError::validation(MISSING))?;

        Ok(NewWorkReport {
            date,
            customer_name,
            location: text(self.location),
            purpose: text(self.purpose),
            in_time: self.in_time,
            out_time: self.out_time,
            issue: text(self.issue),
            machine_system: text(self.machine_system),
            reported_by: text(self.reported_by),
            action_taken: text(self.action_taken),
            status: text(self.status),
            task: text(self.task),
            action_required: text(self.action_required),
            remark: text(self.remark),
            part_number: text(self.part_number),
            serial_number: text(self.serial_number),
            qty: self.qty,
            additional_note: text(self.additional_note),
            prepared_by: text(self.prepared_by),
            submitted_to: text(self.submitted_to),
        })
    }
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct WorkReportFilter {
    /// First visit date, inclusive (YYYY-MM-DD)
    #[param(value_type = Option<String>, example = "2025-10-01")]
    pub from: Option<NaiveDate>,
    /// Last visit date, inclusive (YYYY-MM-DD)
    #[param(value_type = Option<String>, example = "2025-10-31")]
    pub to: Option<NaiveDate>,
    /// Exact author name, or `all`
    #[param(example = "Amara Okafor")]
    pub prepared_by: Option<String>,
}

impl WorkReportFilter {
    fn to_scan(&self) -> WorkReportScan {
        let prepared_by = if is_wildcard(self.prepared_by.as_deref()) {
            None
        } else {
            self.prepared_by.as_deref().map(|s| s.trim().to_string())
        };
        WorkReportScan {
            prepared_by,
            from: self.from,
            to: self.to,
        }
    }
}

/// File a work report
#[utoipa::path(
    post,
    path = "/api/work-reports",
    request_body = CreateWorkReport,
    responses(
        (status = 201, description = "Work report filed", body = WorkReport),
        (status = 400, description = "Date or customer name missing, or a malformed time")
    ),
    tag = "Work Report"
)]
pub async fn create_work_report(
    store: web::Data<dyn Store>,
    payload: web::Json<CreateWorkReport>,
) -> Result<HttpResponse, AppError> {
    let new = payload.into_inner().into_new()?;
    let report = store.insert_work_report(new).await?;
    tracing::info!(work_report_id = report.id, date = %report.date, "Work report filed");
    Ok(HttpResponse::Created().json(report))
}

/// List work reports, newest first
#[utoipa::path(
    get,
    path = "/api/work-reports",
    params(WorkReportFilter),
    responses(
        (status = 200, description = "Matching work reports", body = [WorkReport])
    ),
    tag = "Work Report"
)]
pub async fn list_work_reports(
    store: web::Data<dyn Store>,
    query: web::Query<WorkReportFilter>,
) -> Result<HttpResponse, AppError> {
    let reports = store.list_work_reports(&query.to_scan()).await?;
    Ok(HttpResponse::Ok().json(reports))
}

/// Distinct report authors
#[utoipa::path(
    get,
    path = "/api/work-reports/prepared-by",
    responses(
        (status = 200, description = "Author names, ascending", body = [String], example = json!(["Amara Okafor", "Samuel Reyes"]))
    ),
    tag = "Work Report"
)]
pub async fn list_authors(store: web::Data<dyn Store>) -> Result<HttpResponse, AppError> {
    let authors = store.work_report_authors().await?;
    Ok(HttpResponse::Ok().json(authors))
}
