use actix_web::{HttpResponse, web};
use chrono::Local;

use crate::accounting::dashboard::daily_dashboard;
use crate::error::AppError;
use crate::model::report::DailyDashboard;
use crate::store::Store;

/// Today's headcount
#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Counts for the server's current date", body = DailyDashboard),
        (status = 500, description = "Internal server error")
    ),
    tag = "Dashboard"
)]
pub async fn get_dashboard(store: web::Data<dyn Store>) -> Result<HttpResponse, AppError> {
    let today = Local::now().date_naive();
    let dashboard = daily_dashboard(store.get_ref(), today).await?;
    Ok(HttpResponse::Ok().json(dashboard))
}
