//! Error types for the Assetlog server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Numeric error codes returned to API clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthorized = 2,
    DbFailure = 3,
    NoSuchData = 4,
    BadValue = 5,
    InvalidInterval = 10,
    NoSuchSchedule = 11,
    NoSuchEquipment = 12,
    EquipmentInactive = 13,
    ConcurrentModification = 14,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Invalid maintenance interval: {0} days (must be positive)")]
    InvalidInterval(i32),

    #[error("Maintenance schedule {0} not found or inactive")]
    ScheduleNotFound(i32),

    #[error("Equipment {0} not found")]
    EquipmentNotFound(i32),

    #[error("Equipment {0} is already inactive")]
    AlreadyInactive(i32),

    #[error("Concurrent modification: {0}")]
    ConcurrentModification(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::Authentication(_) => (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthorized),
            AppError::Authorization(_) => (StatusCode::FORBIDDEN, ErrorCode::NotAuthorized),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchData),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DbFailure),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Failure),
            AppError::InvalidInterval(_) => (StatusCode::BAD_REQUEST, ErrorCode::InvalidInterval),
            AppError::ScheduleNotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchSchedule),
            AppError::EquipmentNotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchEquipment),
            AppError::AlreadyInactive(_) => (StatusCode::CONFLICT, ErrorCode::EquipmentInactive),
            AppError::ConcurrentModification(_) => {
                (StatusCode::CONFLICT, ErrorCode::ConcurrentModification)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::Authentication(msg)
            | AppError::Authorization(msg)
            | AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::ConcurrentModification(msg) => msg.clone(),
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
