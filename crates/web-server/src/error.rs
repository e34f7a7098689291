use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] database::DbError),
    #[error("Calculator error: {0}")]
    Calculator(#[from] calculator::CalculatorError),
    /// A request body or query string that does not fit its schema.
    #[error("Invalid request: {message}")]
    Validation { status: StatusCode, message: String },
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: message.into(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: rejection.body_text(),
        }
    }
}

/// Converts our custom `AppError` into an HTTP response.
///
/// A missing composite index is the caller's to fix, so it is a 400 carrying the
/// remediation link. Every other store or calculator failure is a 500 with the
/// underlying message.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(db_err) if db_err.is_index_required() => {
                tracing::warn!(error = %db_err, "Query rejected for a missing index.");
                (StatusCode::BAD_REQUEST, db_err.to_string())
            }
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                (StatusCode::INTERNAL_SERVER_ERROR, db_err.to_string())
            }
            AppError::Calculator(calc_err) => {
                tracing::error!(error = ?calc_err, "Calculator error.");
                (StatusCode::INTERNAL_SERVER_ERROR, calc_err.to_string())
            }
            AppError::Validation { status, message } => {
                tracing::debug!(%status, %message, "Rejected malformed request.");
                (status, message)
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
