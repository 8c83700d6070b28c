//! Custom error types for the booking service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Custom error type for the booking service
///
/// Every rule violation carries the user-presentable reason for the specific
/// check that failed; storage failures are surfaced as a generic message.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed input: empty field, bad character set, weak password,
    /// invalid date, slot, or role
    #[error("{0}")]
    Validation(String),

    /// A uniqueness rule would be violated: duplicate username, or the
    /// doctor/date/time slot is already booked
    #[error("{0}")]
    Conflict(String),

    /// Missing or invalid credentials
    #[error("Invalid username or password")]
    Unauthorized,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    /// Map a storage error from an insert, turning a uniqueness violation
    /// into the given conflict. This is what resolves a check-then-insert
    /// race: the second writer loses at the constraint, not silently.
    pub fn conflict_on_unique(err: sqlx::Error, conflict_message: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(conflict_message.to_string())
            }
            _ => AppError::Database(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Invalid username or password".to_string(),
            ),
            AppError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for booking service results
pub type AppResult<T> = Result<T, AppError>;
