use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use super::{load_directory, required};
use crate::accounting::filter::{LeaveQuery, NameMatch, resolve_employee};
use crate::accounting::leave_days::leave_days;
use crate::error::AppError;
use crate::model::leave::{LeaveRecord, LeaveStatus, LeaveType, NewLeave};
use crate::store::Store;

/// Leave application or edit. Every field except `status` is required.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeavePayload {
    #[schema(example = "Amara Okafor")]
    pub user_name: Option<String>,
    pub leave_type: Option<LeaveType>,
    #[schema(example = "2025-10-01", format = "date", value_type = String)]
    pub start_date: Option<NaiveDate>,
    #[schema(example = "2025-10-05", format = "date", value_type = String)]
    pub end_date: Option<NaiveDate>,
    /// Defaults to PENDING on application; kept as-is on edit when omitted.
    pub status: Option<LeaveStatus>,
    #[schema(example = "Family event")]
    pub reason: Option<String>,
}

/// Fields of a payload that passed validation.
struct ValidLeave<'a> {
    user_name: &'a str,
    leave_type: LeaveType,
    start_date: NaiveDate,
    end_date: NaiveDate,
    number_of_days: u32,
    reason: &'a str,
}

impl LeavePayload {
    fn validate(&self) -> Result<ValidLeave<'_>, AppError> {
        const MISSING: &str = "All fields are required, including reason.";
        let user_name = required(self.user_name.as_deref(), MISSING)?;
        let reason = required(self.reason.as_deref(), MISSING)?;
        let (Some(leave_type), Some(start_date), Some(end_date)) =
            (self.leave_type, self.start_date, self.end_date)
        else {
            return Err(AppError::validation(MISSING));
        };
        let number_of_days = leave_days(start_date, end_date)?;
        Ok(ValidLeave {
            user_name,
            leave_type,
            start_date,
            end_date,
            number_of_days,
            reason,
        })
    }
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaveFilter {
    /// Range start (YYYY-MM-DD); used only together with `to`
    #[param(value_type = Option<String>, example = "2025-10-01")]
    pub from: Option<NaiveDate>,
    /// Range end (YYYY-MM-DD); used only together with `from`
    #[param(value_type = Option<String>, example = "2025-10-31")]
    pub to: Option<NaiveDate>,
    /// Employee name, or `all`
    #[param(example = "all")]
    pub employee: Option<String>,
    /// PENDING, APPROVED, REJECTED or `all`
    #[param(example = "APPROVED")]
    pub status: Option<String>,
    /// SICK, CASUAL or `all`
    #[param(example = "all")]
    pub leave_type: Option<String>,
}

impl LeaveFilter {
    pub(crate) fn to_query(&self, mode: NameMatch) -> Result<LeaveQuery, AppError> {
        LeaveQuery::parse(
            self.from,
            self.to,
            self.employee.as_deref(),
            self.status.as_deref(),
            self.leave_type.as_deref(),
            mode,
        )
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": 3,
    "employeeId": 1,
    "employee": "Amara Okafor",
    "leaveType": "CASUAL",
    "startDate": "2025-10-01",
    "endDate": "2025-10-05",
    "numberOfDays": 5,
    "status": "APPROVED",
    "reason": "Family event"
}))]
pub struct LeaveView {
    pub id: u64,
    pub employee_id: u64,
    pub employee: String,
    pub leave_type: LeaveType,
    #[schema(value_type = String, format = "date")]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = "date")]
    pub end_date: NaiveDate,
    pub number_of_days: u32,
    pub status: LeaveStatus,
    pub reason: String,
}

impl LeaveView {
    pub fn new(record: LeaveRecord, employee: &str) -> Self {
        Self {
            id: record.id,
            employee_id: record.employee_id,
            employee: employee.to_string(),
            leave_type: record.leave_type,
            start_date: record.start_date,
            end_date: record.end_date,
            number_of_days: record.number_of_days,
            status: record.status,
            reason: record.reason,
        }
    }
}

pub(crate) async fn filtered_views(store: &dyn Store, query: &LeaveQuery) -> Result<Vec<LeaveView>, AppError> {
    let directory = load_directory(store).await?;
    let leaves = store.list_leaves(&query.scan()).await?;
    Ok(query
        .apply(leaves, &directory)
        .into_iter()
        .map(|l| {
            let name = directory.name_of(l.employee_id).to_string();
            LeaveView::new(l, &name)
        })
        .collect())
}

/// Apply for leave
#[utoipa::path(
    post,
    path = "/api/leave",
    request_body = LeavePayload,
    responses(
        (status = 201, description = "Leave applied", body = Object, example = json!({
            "message": "Leave applied successfully",
            "leave": { "id": 3, "numberOfDays": 5, "status": "PENDING" }
        })),
        (status = 400, description = "Missing fields or end date before start date"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    store: web::Data<dyn Store>,
    payload: web::Json<LeavePayload>,
) -> Result<HttpResponse, AppError> {
    let valid = payload.validate()?;

    let employees = store.employees(None).await?;
    let employee = resolve_employee(&employees, valid.user_name)?;

    let leave = store
        .insert_leave(NewLeave {
            employee_id: employee.id,
            leave_type: valid.leave_type,
            start_date: valid.start_date,
            end_date: valid.end_date,
            number_of_days: valid.number_of_days,
            status: payload.status.unwrap_or_default(),
            reason: valid.reason.to_string(),
        })
        .await?;

    tracing::info!(
        leave_id = leave.id,
        employee_id = employee.id,
        days = leave.number_of_days,
        "Leave applied"
    );

    Ok(HttpResponse::Created().json(json!({
        "message": "Leave applied successfully",
        "leave": LeaveView::new(leave, &employee.name)
    })))
}

/// List leave records
#[utoipa::path(
    get,
    path = "/api/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Leave records", body = [LeaveView]),
        (status = 400, description = "Invalid status or leave type filter")
    ),
    tag = "Leave"
)]
pub async fn list_leaves(
    store: web::Data<dyn Store>,
    query: web::Query<LeaveFilter>,
) -> Result<HttpResponse, AppError> {
    let query = query.to_query(NameMatch::ExactIgnoreCase)?;
    let data = filtered_views(store.get_ref(), &query).await?;
    Ok(HttpResponse::Ok().json(data))
}

/// Get a leave record
#[utoipa::path(
    get,
    path = "/api/leave/{leave_id}",
    params(("leave_id" = u64, Path, description = "Leave record id")),
    responses(
        (status = 200, description = "Leave record", body = LeaveView),
        (status = 404, description = "Leave not found", body = Object, example = json!({
            "success": false,
            "message": "Leave not found"
        }))
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    store: web::Data<dyn Store>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let leave = store
        .get_leave(path.into_inner())
        .await?
        .ok_or(AppError::NotFound("Leave"))?;
    let directory = load_directory(store.get_ref()).await?;
    let name = directory.name_of(leave.employee_id).to_string();
    Ok(HttpResponse::Ok().json(LeaveView::new(leave, &name)))
}

/// Edit a leave record; the day count is recomputed
#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}",
    params(("leave_id" = u64, Path, description = "Leave record id")),
    request_body = LeavePayload,
    responses(
        (status = 200, description = "Leave updated", body = Object, example = json!({
            "message": "Leave updated successfully"
        })),
        (status = 400, description = "Missing fields or end date before start date"),
        (status = 404, description = "Leave or employee not found")
    ),
    tag = "Leave"
)]
pub async fn update_leave(
    store: web::Data<dyn Store>,
    path: web::Path<u64>,
    payload: web::Json<LeavePayload>,
) -> Result<HttpResponse, AppError> {
    let leave_id = path.into_inner();
    let valid = payload.validate()?;

    let employees = store.employees(None).await?;
    let employee = resolve_employee(&employees, valid.user_name)?;

    let existing = store
        .get_leave(leave_id)
        .await?
        .ok_or(AppError::NotFound("Leave"))?;

    let updated = LeaveRecord {
        id: leave_id,
        employee_id: employee.id,
        leave_type: valid.leave_type,
        start_date: valid.start_date,
        end_date: valid.end_date,
        number_of_days: valid.number_of_days,
        status: payload.status.unwrap_or(existing.status),
        reason: valid.reason.to_string(),
    };

    if !store.update_leave(&updated).await? {
        return Err(AppError::NotFound("Leave"));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Leave updated successfully",
        "leave": LeaveView::new(updated, &employee.name)
    })))
}

/// Delete a leave record
#[utoipa::path(
    delete,
    path = "/api/leave/{leave_id}",
    params(("leave_id" = u64, Path, description = "Leave record id")),
    responses(
        (status = 200, description = "Leave deleted", body = Object, example = json!({
            "message": "Leave deleted"
        })),
        (status = 404, description = "Leave not found")
    ),
    tag = "Leave"
)]
pub async fn delete_leave(
    store: web::Data<dyn Store>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let leave_id = path.into_inner();
    if !store.delete_leave(leave_id).await? {
        return Err(AppError::NotFound("Leave"));
    }
    tracing::info!(leave_id, "Leave deleted");
    Ok(HttpResponse::Ok().json(json!({ "message": "Leave deleted" })))
}

async fn review(store: &dyn Store, leave_id: u64, decision: LeaveStatus) -> Result<(), AppError> {
    if store
        .transition_leave(leave_id, LeaveStatus::Pending, decision)
        .await?
    {
        tracing::info!(leave_id, decision = %decision, "Leave reviewed");
        return Ok(());
    }
    match store.get_leave(leave_id).await? {
        None => Err(AppError::NotFound("Leave")),
        Some(leave) => Err(AppError::Conflict(format!(
            "Leave request already processed ({})",
            leave.status
        ))),
    }
}

/// Approve a pending leave
#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/approve",
    params(("leave_id" = u64, Path, description = "ID of the leave request to approve")),
    responses(
        (status = 200, description = "Leave approved", body = Object, example = json!({
            "message": "Leave approved"
        })),
        (status = 404, description = "Leave not found"),
        (status = 409, description = "Leave already processed")
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    store: web::Data<dyn Store>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    review(store.get_ref(), path.into_inner(), LeaveStatus::Approved).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Leave approved" })))
}

/// Reject a pending leave
#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/reject",
    params(("leave_id" = u64, Path, description = "ID of the leave request to reject")),
    responses(
        (status = 200, description = "Leave rejected", body = Object, example = json!({
            "message": "Leave rejected"
        })),
        (status = 404, description = "Leave not found"),
        (status = 409, description = "Leave already processed")
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    store: web::Data<dyn Store>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    review(store.get_ref(), path.into_inner(), LeaveStatus::Rejected).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Leave rejected" })))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test};
    use serde_json::Value;

    use super::*;
    use crate::routes;
    use crate::store::memory::MemoryStore;
    use crate::store::memory::fixtures::roster;

    fn store() -> web::Data<dyn Store> {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::with_employees(roster()));
        web::Data::from(store)
    }

    fn application(name: &str, start: &str, end: &str) -> Value {
        json!({
            "userName": name,
            "leaveType": "CASUAL",
            "startDate": start,
            "endDate": end,
            "reason": "Family event"
        })
    }

    #[actix_web::test]
    async fn apply_counts_inclusive_days() {
        let app = test::init_service(
            App::new()
                .app_data(store())
                .service(routes::api_scope("/api")),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/leave")
            .set_json(application("Amara", "2025-10-01", "2025-10-05"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["leave"]["numberOfDays"], 5);
        assert_eq!(body["leave"]["status"], "PENDING");
    }

    #[actix_web::test]
    async fn reversed_range_is_rejected_before_persisting() {
        let store = store();
        let app = test::init_service(
            App::new()
                .app_data(store.clone())
                .service(routes::api_scope("/api")),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/leave")
            .set_json(application("Amara", "2025-10-05", "2025-10-01"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let stored = store.list_leaves(&Default::default()).await.unwrap();
        assert!(stored.is_empty());
    }

    #[actix_web::test]
    async fn missing_reason_is_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(store())
                .service(routes::api_scope("/api")),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/leave")
            .set_json(json!({
                "userName": "Amara",
                "leaveType": "SICK",
                "startDate": "2025-10-01",
                "endDate": "2025-10-01"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn review_only_once() {
        let app = test::init_service(
            App::new()
                .app_data(store())
                .service(routes::api_scope("/api")),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/leave")
            .set_json(application("Samuel", "2025-10-01", "2025-10-01"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let id = body["leave"]["id"].as_u64().unwrap();

        let req = test::TestRequest::put()
            .uri(&format!("/api/leave/{}/approve", id))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::put()
            .uri(&format!("/api/leave/{}/reject", id))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::put().uri("/api/leave/99/approve").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn edit_recounts_days_and_keeps_status() {
        let app = test::init_service(
            App::new()
                .app_data(store())
                .service(routes::api_scope("/api")),
        )
        .await;

        let mut payload = application("Amara", "2025-10-01", "2025-10-01");
        payload["status"] = json!("APPROVED");
        let req = test::TestRequest::post().uri("/api/leave").set_json(payload).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let id = body["leave"]["id"].as_u64().unwrap();

        let req = test::TestRequest::put()
            .uri(&format!("/api/leave/{}", id))
            .set_json(application("Amara", "2025-10-01", "2025-10-03"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["leave"]["numberOfDays"], 3);
        assert_eq!(body["leave"]["status"], "APPROVED");
    }

    #[actix_web::test]
    async fn edit_to_reversed_range_keeps_stored_leave() {
        let store = store();
        let app = test::init_service(
            App::new()
                .app_data(store.clone())
                .service(routes::api_scope("/api")),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/leave")
            .set_json(application("Amara", "2025-10-01", "2025-10-03"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let id = body["leave"]["id"].as_u64().unwrap();

        let req = test::TestRequest::put()
            .uri(&format!("/api/leave/{}", id))
            .set_json(application("Amara", "2025-10-09", "2025-10-02"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);

        let stored = store.get_leave(id).await.unwrap().unwrap();
        assert_eq!(stored.start_date, NaiveDate::from_ymd_opt(2025, 10, 1).unwrap());
        assert_eq!(stored.end_date, NaiveDate::from_ymd_opt(2025, 10, 3).unwrap());
        assert_eq!(stored.number_of_days, 3);
    }

    #[actix_web::test]
    async fn malformed_body_uses_error_envelope() {
        let app = test::init_service(
            App::new()
                .app_data(store())
                .service(routes::api_scope("/api")),
        )
        .await;

        let mut payload = application("Amara", "2025-10-01", "2025-10-01");
        payload["leaveType"] = json!("vacation");
        let req = test::TestRequest::post().uri("/api/leave").set_json(payload).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().starts_with("Invalid request body"));

        let req = test::TestRequest::get().uri("/api/leave?from=yesterday").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
    }

    #[actix_web::test]
    async fn list_uses_overlap_and_status() {
        let app = test::init_service(
            App::new()
                .app_data(store())
                .service(routes::api_scope("/api")),
        )
        .await;

        for (start, end) in [("2025-09-28", "2025-10-02"), ("2025-11-03", "2025-11-04")] {
            let mut payload = application("Amara", start, end);
            payload["status"] = json!("APPROVED");
            let req = test::TestRequest::post().uri("/api/leave").set_json(payload).to_request();
            test::call_service(&app, req).await;
        }

        let req = test::TestRequest::get()
            .uri("/api/leave?from=2025-10-01&to=2025-10-31&status=approved&employee=AMARA")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["startDate"], "2025-09-28");
    }
}
