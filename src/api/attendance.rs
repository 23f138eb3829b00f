use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use super::{load_directory, required};
use crate::accounting::filter::{AttendanceQuery, NameMatch, resolve_employee};
use crate::accounting::status::derive;
use crate::accounting::work_time::{format_clock, parse_optional_clock};
use crate::error::AppError;
use crate::model::attendance::{
    AttendanceRecord, AttendanceStatus, NewAttendance, WorkLocation, site_name_for,
};
use crate::store::Store;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttendance {
    #[schema(example = "Amara Okafor")]
    pub user_name: Option<String>,
    #[schema(example = "2025-10-06", format = "date", value_type = String)]
    pub date: Option<NaiveDate>,
    #[schema(example = "09:00")]
    pub checkin: Option<String>,
    #[schema(example = "18:00")]
    pub checkout: Option<String>,
    pub location: Option<WorkLocation>,
    #[schema(example = "Dock 4")]
    pub site_name: Option<String>,
    /// Used only when neither check-in nor check-out is given.
    pub status: Option<AttendanceStatus>,
}

/// Correction of an existing record. Omitted times keep their current value;
/// status is always re-derived.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttendance {
    #[schema(example = "09:00")]
    pub checkin: Option<String>,
    #[schema(example = "17:30")]
    pub checkout: Option<String>,
    pub location: Option<WorkLocation>,
    pub site_name: Option<String>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceFilter {
    /// Single calendar day (YYYY-MM-DD)
    #[param(value_type = Option<String>, example = "2025-10-06")]
    pub date: Option<NaiveDate>,
    /// Employee name, or `all`
    #[param(example = "all")]
    pub employee: Option<String>,
    /// PRESENT, HALF_DAY, ABSENT or `all`
    #[param(example = "all")]
    pub status: Option<String>,
}

impl AttendanceFilter {
    pub(crate) fn to_query(&self, mode: NameMatch) -> Result<AttendanceQuery, AppError> {
        AttendanceQuery::parse(self.date, self.employee.as_deref(), self.status.as_deref(), mode)
    }
}

/// Attendance row with derived fields, as listed and exported.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": 7,
    "employeeId": 1,
    "employee": "Amara Okafor",
    "date": "2025-10-06",
    "checkInTime": "09:00",
    "checkOutTime": "18:00",
    "workHr": "9hr 0m",
    "status": "PRESENT",
    "location": "office",
    "siteName": null
}))]
pub struct AttendanceView {
    pub id: u64,
    pub employee_id: u64,
    pub employee: String,
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
    pub work_hr: Option<String>,
    pub status: AttendanceStatus,
    pub location: WorkLocation,
    pub site_name: Option<String>,
}

impl AttendanceView {
    pub fn new(record: AttendanceRecord, employee: &str) -> Self {
        Self {
            id: record.id,
            employee_id: record.employee_id,
            employee: employee.to_string(),
            date: record.date,
            check_in_time: format_clock(record.check_in),
            check_out_time: format_clock(record.check_out),
            work_hr: record.work_hr,
            status: record.status,
            location: record.location,
            site_name: record.site_name,
        }
    }
}

pub(crate) async fn filtered_views(
    store: &dyn Store,
    query: &AttendanceQuery,
) -> Result<Vec<AttendanceView>, AppError> {
    let directory = load_directory(store).await?;
    let records = store.list_attendance(&query.scan()).await?;
    Ok(query
        .apply(records, &directory)
        .into_iter()
        .map(|r| {
            let name = directory.name_of(r.employee_id).to_string();
            AttendanceView::new(r, &name)
        })
        .collect())
}

/// Record attendance
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = CreateAttendance,
    responses(
        (status = 200, description = "Attendance recorded", body = Object, example = json!({
            "success": true,
            "data": { "id": 7, "employee": "Amara Okafor", "workHr": "9hr 0m", "status": "PRESENT" }
        })),
        (status = 400, description = "Missing required fields"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn create_attendance(
    store: web::Data<dyn Store>,
    payload: web::Json<CreateAttendance>,
) -> Result<HttpResponse, AppError> {
    let payload = payload.into_inner();
    let user_name = required(payload.user_name.as_deref(), "Please fill all required fields")?;
    let date = payload
        .date
        .ok_or_else(|| AppError::validation("Please fill all required fields"))?;

    let employees = store.employees(None).await?;
    let employee = resolve_employee(&employees, user_name)?;

    let check_in = parse_optional_clock(payload.checkin.as_deref())?;
    let check_out = parse_optional_clock(payload.checkout.as_deref())?;
    let derived = derive(check_in, check_out, payload.status);
    let location = payload.location.unwrap_or(WorkLocation::Office);

    let record = store
        .insert_attendance(NewAttendance {
            employee_id: employee.id,
            date,
            check_in,
            check_out,
            work_hr: derived.work_hr(),
            status: derived.status,
            location,
            site_name: site_name_for(location, payload.site_name),
        })
        .await?;

    tracing::info!(
        attendance_id = record.id,
        employee_id = employee.id,
        status = %record.status,
        "Attendance recorded"
    );

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": AttendanceView::new(record, &employee.name)
    })))
}

/// List attendance records
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceFilter),
    responses(
        (status = 200, description = "Attendance records", body = Object),
        (status = 400, description = "Invalid status filter")
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    store: web::Data<dyn Store>,
    query: web::Query<AttendanceFilter>,
) -> Result<HttpResponse, AppError> {
    let query = query.to_query(NameMatch::ExactIgnoreCase)?;
    let data = filtered_views(store.get_ref(), &query).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data })))
}

/// Get one attendance record
#[utoipa::path(
    get,
    path = "/api/attendance/{attendance_id}",
    params(("attendance_id" = u64, Path, description = "Attendance record id")),
    responses(
        (status = 200, description = "Attendance record", body = AttendanceView),
        (status = 404, description = "Attendance record not found")
    ),
    tag = "Attendance"
)]
pub async fn get_attendance(
    store: web::Data<dyn Store>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let record = store
        .get_attendance(path.into_inner())
        .await?
        .ok_or(AppError::NotFound("Attendance record"))?;
    let directory = load_directory(store.get_ref()).await?;
    let name = directory.name_of(record.employee_id).to_string();
    Ok(HttpResponse::Ok().json(AttendanceView::new(record, &name)))
}

/// Correct an attendance record
#[utoipa::path(
    put,
    path = "/api/attendance/{attendance_id}",
    params(("attendance_id" = u64, Path, description = "Attendance record id")),
    request_body = UpdateAttendance,
    responses(
        (status = 200, description = "Attendance updated", body = Object, example = json!({
            "success": true,
            "message": "Attendance updated successfully"
        })),
        (status = 404, description = "Attendance record not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn update_attendance(
    store: web::Data<dyn Store>,
    path: web::Path<u64>,
    payload: web::Json<UpdateAttendance>,
) -> Result<HttpResponse, AppError> {
    let attendance_id = path.into_inner();
    let payload = payload.into_inner();

    let mut record = store
        .get_attendance(attendance_id)
        .await?
        .ok_or(AppError::NotFound("Attendance record"))?;

    if let Some(t) = parse_optional_clock(payload.checkin.as_deref())? {
        record.check_in = Some(t);
    }
    if let Some(t) = parse_optional_clock(payload.checkout.as_deref())? {
        record.check_out = Some(t);
    }

    let derived = derive(record.check_in, record.check_out, Some(record.status));
    record.work_hr = derived.work_hr();
    record.status = derived.status;

    record.location = payload.location.unwrap_or(record.location);
    let site_name = payload.site_name.or_else(|| record.site_name.take());
    record.site_name = site_name_for(record.location, site_name);

    if !store.update_attendance(&record).await? {
        return Err(AppError::NotFound("Attendance record"));
    }

    let directory = load_directory(store.get_ref()).await?;
    let name = directory.name_of(record.employee_id).to_string();

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Attendance updated successfully",
        "data": AttendanceView::new(record, &name)
    })))
}

/// Delete an attendance record
#[utoipa::path(
    delete,
    path = "/api/attendance/{attendance_id}",
    params(("attendance_id" = u64, Path, description = "Attendance record id")),
    responses(
        (status = 200, description = "Attendance deleted", body = Object, example = json!({
            "success": true,
            "message": "Attendance deleted successfully"
        })),
        (status = 404, description = "Attendance record not found")
    ),
    tag = "Attendance"
)]
pub async fn delete_attendance(
    store: web::Data<dyn Store>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let attendance_id = path.into_inner();
    if !store.delete_attendance(attendance_id).await? {
        return Err(AppError::NotFound("Attendance record"));
    }
    tracing::info!(attendance_id, "Attendance deleted");
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Attendance deleted successfully"
    })))
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

    #[actix_web::test]
    async fn create_derives_status_and_duration() {
        let app = test::init_service(
            App::new()
                .app_data(store())
                .service(routes::api_scope("/api")),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/attendance")
            .set_json(json!({
                "userName": "Amara",
                "date": "2025-10-06",
                "checkin": "22:00",
                "checkout": "02:00",
                "location": "site",
                "siteName": "Dock 4"
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["data"]["workHr"], "4hr 0m");
        assert_eq!(body["data"]["status"], "HALF_DAY");
        assert_eq!(body["data"]["siteName"], "Dock 4");
        assert_eq!(body["data"]["checkInTime"], "22:00");
    }

    #[actix_web::test]
    async fn open_shift_is_present_without_duration() {
        let app = test::init_service(
            App::new()
                .app_data(store())
                .service(routes::api_scope("/api")),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/attendance")
            .set_json(json!({ "userName": "Samuel", "date": "2025-10-06", "checkin": "09:00" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["data"]["status"], "PRESENT");
        assert!(body["data"]["workHr"].is_null());
        assert_eq!(body["data"]["location"], "office");
    }

    #[actix_web::test]
    async fn unknown_employee_is_404() {
        let app = test::init_service(
            App::new()
                .app_data(store())
                .service(routes::api_scope("/api")),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/attendance")
            .set_json(json!({ "userName": "amara", "date": "2025-10-06" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn missing_date_is_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(store())
                .service(routes::api_scope("/api")),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/attendance")
            .set_json(json!({ "userName": "Amara" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn malformed_clock_is_a_generic_failure() {
        let app = test::init_service(
            App::new()
                .app_data(store())
                .service(routes::api_scope("/api")),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/attendance")
            .set_json(json!({ "userName": "Amara", "date": "2025-10-06", "checkin": "nine" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn correction_rederives_status() {
        let app = test::init_service(
            App::new()
                .app_data(store())
                .service(routes::api_scope("/api")),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/attendance")
            .set_json(json!({ "userName": "Amara", "date": "2025-10-06", "checkin": "09:00" }))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["data"]["id"].as_u64().unwrap();

        let req = test::TestRequest::put()
            .uri(&format!("/api/attendance/{}", id))
            .set_json(json!({ "checkout": "11:00" }))
            .to_request();
        let updated: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated["data"]["status"], "ABSENT");
        assert_eq!(updated["data"]["workHr"], "2hr 0m");

        let req = test::TestRequest::put()
            .uri(&format!("/api/attendance/{}", id))
            .set_json(json!({ "checkout": "17:30" }))
            .to_request();
        let updated: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated["data"]["status"], "PRESENT");
        assert_eq!(updated["data"]["workHr"], "8hr 30m");
    }

    #[actix_web::test]
    async fn list_filters_by_exact_name_and_status() {
        let app = test::init_service(
            App::new()
                .app_data(store())
                .service(routes::api_scope("/api")),
        )
        .await;

        for (name, checkout) in [("Amara", "18:00"), ("Amara", "10:00"), ("Samuel", "18:00")] {
            let req = test::TestRequest::post()
                .uri("/api/attendance")
                .set_json(json!({
                    "userName": name,
                    "date": "2025-10-06",
                    "checkin": "09:00",
                    "checkout": checkout
                }))
                .to_request();
            test::call_service(&app, req).await;
        }

        let req = test::TestRequest::get()
            .uri("/api/attendance?employee=amara&status=present&date=2025-10-06")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["employee"], "Amara");

        let req = test::TestRequest::get()
            .uri("/api/attendance?employee=ama&status=all")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn delete_missing_record_is_404() {
        let app = test::init_service(
            App::new()
                .app_data(store())
                .service(routes::api_scope("/api")),
        )
        .await;
        let req = test::TestRequest::delete().uri("/api/attendance/42").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
