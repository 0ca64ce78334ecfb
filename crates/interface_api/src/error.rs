//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use domain_freight::FreightError;
use domain_ledger::LedgerError;
use domain_numbering::NumberingError;
use infra_db::DatabaseError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Unauthorized".to_string(),
            ),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
            ApiError::Database(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", msg.clone())
            }
            ApiError::Validation(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg.clone())
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

impl From<NumberingError> for ApiError {
    fn from(err: NumberingError) -> Self {
        match &err {
            NumberingError::Contention { .. } => ApiError::Conflict(err.to_string()),
            NumberingError::Store(_) => ApiError::Database(err.to_string()),
            // OutOfRange, InvalidConfiguration, UnknownKey
            _ if err.is_client_error() => ApiError::Validation(err.to_string()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match &err {
            LedgerError::Contention { .. } => ApiError::Conflict(err.to_string()),
            LedgerError::DocumentMissing { .. } => ApiError::NotFound(err.to_string()),
            LedgerError::Store(_) => ApiError::Database(err.to_string()),
            _ if err.is_validation() => ApiError::Validation(err.to_string()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<FreightError> for ApiError {
    fn from(err: FreightError) -> Self {
        match &err {
            FreightError::InvalidStatusTransition { .. } => ApiError::Conflict(err.to_string()),
            FreightError::Ledger(LedgerError::Contention { .. }) => {
                ApiError::Conflict(err.to_string())
            }
            FreightError::Ledger(LedgerError::Store(_)) => ApiError::Database(err.to_string()),
            _ => ApiError::Validation(err.to_string()),
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        if err.is_not_found() {
            ApiError::NotFound(err.to_string())
        } else if err.is_constraint_violation() {
            ApiError::Conflict(err.to_string())
        } else {
            ApiError::Database(err.to_string())
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Database(err.to_string())
    }
}
