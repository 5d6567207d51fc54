use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Pipeline outcomes (model rejection, extraction failure, validation failure)
/// are NOT errors at this level; they are 200 rejections. `AppError` covers
/// faults in the request itself or in local I/O.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upload exceeds the {max_bytes}-byte limit")]
    PayloadTooLarge { max_bytes: usize },

    #[error("Upload storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Maps a multipart read failure. axum reports an exceeded body limit as a
    /// stream error, so the configured limit is passed in for the message.
    pub fn from_multipart(e: MultipartError, max_bytes: usize) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge { max_bytes }
        } else {
            AppError::Validation(format!("Malformed multipart body: {}", e.body_text()))
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::PayloadTooLarge { .. } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                self.to_string(),
            ),
            AppError::Io(e) => {
                tracing::error!("Upload storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPLOAD_STORAGE_ERROR",
                    "The upload could not be stored".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
