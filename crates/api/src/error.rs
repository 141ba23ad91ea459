//! JSON error responses.
//!
//! Every failing handler returns an [`ApiError`], which renders as
//! `{"error": "<CODE>", "message": "<text>"}` with the status of the wrapped
//! [`AppError`]. Messages of server-side failures are logged and replaced.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use fintrack_core::directory::DirectoryError;
use fintrack_core::ledger::LedgerError;
use fintrack_shared::AppError;

/// Error body returned by every endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable code.
    pub error: &'static str,
    /// Human-readable message.
    pub message: String,
}

/// An [`AppError`] on its way to the client.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<DirectoryError> for ApiError {
    fn from(err: DirectoryError) -> Self {
        Self(err.into())
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        Self(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(AppError::Validation(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(AppError::Validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = match &self.0 {
            AppError::NotFound(msg) | AppError::Validation(msg) | AppError::Conflict(msg) => {
                msg.clone()
            }
            AppError::Unauthorized(_) => "Invalid email or password".to_string(),
            AppError::Database(_) | AppError::Internal(_) => {
                error!(error = %self.0, "Request failed");
                "An internal error occurred".to_string()
            }
        };

        let body = ErrorBody {
            error: self.0.error_code(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
