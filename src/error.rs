use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Input rejected before anything was persisted.
    #[error("{0}")]
    Validation(String),

    /// Name-to-identity resolution failed; usually a data-entry typo.
    #[error("Employee '{0}' not found. Please check the name.")]
    EmployeeNotFound(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    /// Deterministic computation fault, e.g. a malformed clock string.
    #[error("computation failed: {0}")]
    Computation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::EmployeeNotFound(_) | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Computation(_) | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Computation(detail) => {
                tracing::error!(error = %detail, "Attendance computation failed");
                "Internal Server Error".to_string()
            }
            AppError::Store(e) => {
                tracing::error!(error = %e, "Store operation failed");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "message": message
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn employee_not_found_is_distinct_from_server_errors() {
        let err = AppError::EmployeeNotFound("Amra".into());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert!(err.to_string().contains("Amra"));

        let err = AppError::Computation("bad clock".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let err = AppError::validation("End date cannot be before start date.");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
