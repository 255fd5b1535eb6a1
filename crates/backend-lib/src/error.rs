// ============================
// boathouse-backend-lib/src/error.rs
// ============================
//! Central error type + Axum integration.
//!
//! Raw store and hashing failures arrive wrapped in `AuthError` and stop
//! here: clients only ever see the sanitized message and a stable error code.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::auth::AuthError;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Auth(AuthError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Auth(AuthError::InvalidCredentials) => "AUTH_001",
            AppError::Auth(AuthError::StorageFailure(_)) => "AUTH_002",
            AppError::Auth(AuthError::Hashing(_)) => "AUTH_003",
            AppError::Config(_) => "CFG_001",
        }
    }

    /// Get a sanitized message suitable for clients
    pub fn sanitized_message(&self) -> &'static str {
        match self {
            AppError::Auth(AuthError::InvalidCredentials) => "Invalid username or password",
            _ => "An internal server error occurred",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, code = self.error_code(), "request failed");
        }

        let body = serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.sanitized_message(),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}
