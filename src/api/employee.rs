use actix_web::{HttpResponse, web};

use crate::error::AppError;
use crate::model::employee::{Employee, EmployeeStatus};
use crate::store::Store;

/// Active employees, for name pickers
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "Active employees ordered by id", body = [Employee]),
        (status = 500, description = "Internal server error", body = Object, example = json!({
            "success": false,
            "message": "Internal Server Error"
        }))
    ),
    tag = "Employee"
)]
pub async fn list_employees(store: web::Data<dyn Store>) -> Result<HttpResponse, AppError> {
    let mut employees = store.employees(Some(EmployeeStatus::Active)).await?;
    employees.sort_by_key(|e| e.id);
    tracing::debug!(count = employees.len(), "Listing active employees");
    Ok(HttpResponse::Ok().json(employees))
}
