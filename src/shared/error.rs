//! Application Error Types
//!
//! Centralized error handling with Axum integration.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Invalid CORS configuration. Always fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum CorsConfigError {
    #[error("Invalid allowed-origin pattern '{pattern}': {source}")]
    InvalidOriginRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid header name '{name}'")]
    InvalidHeaderName { name: String },

    #[error("Invalid value for header '{name}'")]
    InvalidHeaderValue { name: String },
}

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, 10003, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, 10000, "Internal server error".into())
            }
        };

        let body = ErrorResponse { code, message };

        (status, Json(body)).into_response()
    }
}
