use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::storage::StorageError;
use crate::validation::ValidationError;

/// Error taxonomy for the monitoring backend.
///
/// Validation failures are always detected before any persistence attempt,
/// and uniqueness conflicts raised by the storage backend pass through
/// unchanged; nothing here retries or partially applies.
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{field} '{value}' already exists")]
    Conflict { field: &'static str, value: String },

    #[error("{0} not found")]
    NotFound(String),

    #[error("invalid credentials")]
    Unauthorized,

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("internal server error: {0}")]
    Internal(String),
}

impl From<StorageError> for MonitorError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UniquenessConflict { field, value } => {
                MonitorError::Conflict { field, value }
            }
            other => MonitorError::Storage(other.to_string()),
        }
    }
}

/// Error response structure
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: &str, message: &str) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl MonitorError {
    pub fn to_status_code(&self) -> StatusCode {
        match self {
            MonitorError::Validation(_) => StatusCode::BAD_REQUEST,
            MonitorError::Conflict { .. } => StatusCode::CONFLICT,
            MonitorError::NotFound(_) => StatusCode::NOT_FOUND,
            MonitorError::Unauthorized => StatusCode::UNAUTHORIZED,
            MonitorError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            MonitorError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            MonitorError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &str {
        match self {
            MonitorError::Validation(_) => "validation_error",
            MonitorError::Conflict { .. } => "uniqueness_conflict",
            MonitorError::NotFound(_) => "not_found",
            MonitorError::Unauthorized => "unauthorized",
            MonitorError::PermissionDenied(_) => "permission_denied",
            MonitorError::Storage(_) => "storage_error",
            MonitorError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for MonitorError {
    fn into_response(self) -> Response {
        let status = self.to_status_code();
        let error_code = self.error_code().to_string();
        let message = self.to_string();

        let mut error_response = ErrorResponse::new(&error_code, &message);
        if let MonitorError::Validation(err) = &self {
            // Per-field violations so clients can highlight each input.
            if let Ok(details) = serde_json::to_value(&err.violations) {
                error_response = error_response.with_details(details);
            }
        }

        (status, Json(error_response)).into_response()
    }
}

/// Result type alias for monitoring operations
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Helper function to create not found errors
pub fn not_found(resource: impl Into<String>) -> MonitorError {
    MonitorError::NotFound(resource.into())
}

/// Helper function to create permission denied errors
pub fn permission_denied(message: impl Into<String>) -> MonitorError {
    MonitorError::PermissionDenied(message.into())
}

/// Helper function to create internal errors
pub fn internal_error(message: impl Into<String>) -> MonitorError {
    MonitorError::Internal(message.into())
}
