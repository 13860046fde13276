//! Rendering of [`AppError`] as HTTP responses.
//!
//! Every variant maps to one status code and a stable `code` string. Sources
//! of server-side errors are logged and never written to the body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::api::dto::ErrorResponse;
use crate::error::AppError;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Duplicate { .. } => StatusCode::CONFLICT,
            AppError::Validation { .. }
            | AppError::ValidationErrors { .. }
            | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } | AppError::InvalidToken { .. } => {
                StatusCode::UNAUTHORIZED
            }
            AppError::ConnectionPool { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::AmbiguousMatch { .. }
            | AppError::Database { .. }
            | AppError::Configuration { .. }
            | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn to_error_response(&self) -> ErrorResponse {
        match self {
            AppError::NotFound { entity } => {
                ErrorResponse::new("NOT_FOUND", &format!("{entity} not found"))
            }
            AppError::Duplicate {
                entity,
                field,
                value,
            } => ErrorResponse::new(
                "DUPLICATE_ENTRY",
                &format!("{entity} with {field} '{value}' already exists"),
            )
            .with_details(json!({ "entity": entity, "field": field })),
            AppError::Validation { field, reason } => {
                ErrorResponse::new("VALIDATION_ERROR", &format!("Invalid value for {field}"))
                    .with_details(json!([{ "field": field, "message": reason }]))
            }
            AppError::ValidationErrors { errors } => {
                ErrorResponse::new("VALIDATION_ERROR", "Request validation failed")
                    .with_details(json!(errors))
            }
            AppError::BadRequest { message } => ErrorResponse::new("BAD_REQUEST", message),
            AppError::Unauthorized { message } => ErrorResponse::new("UNAUTHORIZED", message),
            AppError::InvalidToken { message } => ErrorResponse::new("INVALID_TOKEN", message),
            AppError::AmbiguousMatch { entity, .. } => ErrorResponse::new(
                "AMBIGUOUS_MATCH",
                &format!("More than one {entity} matched"),
            ),
            AppError::Database { .. } => {
                ErrorResponse::new("DATABASE_ERROR", "Database operation failed")
            }
            AppError::Configuration { .. } => {
                ErrorResponse::new("CONFIGURATION_ERROR", "Server misconfiguration")
            }
            AppError::ConnectionPool { .. } => {
                ErrorResponse::new("SERVICE_UNAVAILABLE", "Database connection unavailable")
            }
            AppError::Internal { .. } => {
                ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = ?self, status = status.as_u16(), "Request failed");
        }

        (status, Json(self.to_error_response())).into_response()
    }
}
