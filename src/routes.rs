use crate::{
    api::{attendance, dashboard, employee, leave, report, work_report},
    config::Config,
    error::AppError,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{Scope, web};

fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / u64::from(requests_per_min)).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_default();
    Governor::new(&cfg)
}

/// Malformed bodies and query strings answer with the same envelope as
/// handler errors.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::validation(format!("Invalid request body: {}", err)).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        AppError::validation(format!("Invalid query string: {}", err)).into()
    })
}

/// Every attendance, leave, report, work report and dashboard resource under
/// `prefix`.
pub fn api_scope(prefix: &str) -> Scope {
    web::scope(prefix)
        .app_data(json_config())
        .app_data(query_config())
        .service(web::resource("/dashboard").route(web::get().to(dashboard::get_dashboard)))
        .service(web::resource("/employees").route(web::get().to(employee::list_employees)))
        .service(
            web::scope("/attendance")
                // /attendance/reports/*
                .service(
                    web::resource("/reports/monthly")
                        .route(web::get().to(report::monthly_report)),
                )
                .service(
                    web::resource("/reports/export")
                        .route(web::get().to(report::export_attendance)),
                )
                // /attendance
                .service(
                    web::resource("")
                        .route(web::post().to(attendance::create_attendance))
                        .route(web::get().to(attendance::list_attendance)),
                )
                // /attendance/{id}
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(attendance::get_attendance))
                        .route(web::put().to(attendance::update_attendance))
                        .route(web::delete().to(attendance::delete_attendance)),
                ),
        )
        .service(
            web::scope("/leave")
                // /leave/reports/export
                .service(
                    web::resource("/reports/export").route(web::get().to(report::export_leaves)),
                )
                // /leave
                .service(
                    web::resource("")
                        .route(web::get().to(leave::list_leaves))
                        .route(web::post().to(leave::create_leave)),
                )
                // /leave/{id}
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(leave::get_leave))
                        .route(web::put().to(leave::update_leave))
                        .route(web::delete().to(leave::delete_leave)),
                )
                // /leave/{id}/approve
                .service(
                    web::resource("/{id}/approve").route(web::put().to(leave::approve_leave)),
                )
                // /leave/{id}/reject
                .service(web::resource("/{id}/reject").route(web::put().to(leave::reject_leave))),
        )
        .service(
            web::scope("/work-reports")
                // /work-reports/prepared-by
                .service(
                    web::resource("/prepared-by")
                        .route(web::get().to(work_report::list_authors)),
                )
                // /work-reports
                .service(
                    web::resource("")
                        .route(web::post().to(work_report::create_work_report))
                        .route(web::get().to(work_report::list_work_reports)),
                ),
        )
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    let limiter = build_limiter(config.rate_protected_per_min);
    cfg.service(api_scope(&config.api_prefix).wrap(limiter));
}
