//! Error types for the inkcoach server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::llm::ProviderError;
use crate::storage::UploadError;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        // Provider and upload details stay server-side; clients get a
        // generic message and no partial results.
        let (status, code, message) = match &self {
            ServerError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg.clone())
            }
            ServerError::Provider(err) => {
                error!("provider call failed: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PROVIDER_ERROR",
                    "Failed to process request".to_string(),
                )
            }
            ServerError::Upload(err) => {
                error!("storage upload failed: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPLOAD_ERROR",
                    "Failed to upload file".to_string(),
                )
            }
            ServerError::Internal(msg) => {
                error!("internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            success: false,
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
