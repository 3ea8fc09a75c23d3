use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use core_types::CoreError;
use database::DbError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] CoreError),
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

/// Converts our custom `AppError` into an HTTP response.
///
/// This is the single place where error kinds become status codes, and
/// where server-side errors get logged. Client mistakes (validation,
/// unknown ids) are reported without logging noise.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            AppError::Database(DbError::NotFound) => {
                (StatusCode::NOT_FOUND, "Property not found".to_string())
            }
            AppError::Database(err @ DbError::ConnectionUnavailable(_)) => {
                tracing::error!(error = ?err, "No database connection available.");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "The database is temporarily unavailable".to_string(),
                )
            }
            AppError::Database(err @ DbError::ConstraintViolation(_)) => {
                // The payload was validated before the write, so the
                // engine rejecting it means the two rule sets drifted.
                tracing::error!(error = ?err, "Storage constraint rejected a validated write.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal database error occurred".to_string(),
                )
            }
            AppError::Database(err) => {
                tracing::error!(error = ?err, "Database error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal database error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
