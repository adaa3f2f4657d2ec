use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::document::UploadRejection;
use crate::analysis::notice::Notice;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Upload rejected: {0}")]
    Rejected(#[from] UploadRejection),

    #[error("Malformed upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Not a multipart upload: {0}")]
    NotMultipart(#[from] MultipartRejection),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, notice) = match &self {
            AppError::Rejected(rejection) => {
                let (status, code) = match rejection {
                    UploadRejection::MissingInformation => {
                        (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
                    }
                    UploadRejection::InvalidFileType { media_type } => {
                        tracing::warn!(%media_type, "Rejected upload: unsupported media type");
                        (StatusCode::UNSUPPORTED_MEDIA_TYPE, "INVALID_FILE_TYPE")
                    }
                    UploadRejection::FileTooLarge { size } => {
                        tracing::warn!(size, "Rejected upload: file too large");
                        (StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE")
                    }
                };
                let message = rejection.to_string();
                let notice = Notice::destructive(rejection.title(), message.clone());
                (status, code, message, notice)
            }
            AppError::Multipart(e) => {
                tracing::warn!("Multipart error: {e}");
                if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    let rejection = UploadRejection::FileTooLarge { size: 0 };
                    let message = rejection.to_string();
                    let notice = Notice::destructive(rejection.title(), message.clone());
                    (StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE", message, notice)
                } else {
                    (
                        StatusCode::BAD_REQUEST,
                        "MALFORMED_UPLOAD",
                        e.body_text(),
                        Notice::analysis_failed(),
                    )
                }
            }
            AppError::NotMultipart(rejection) => {
                tracing::warn!("Multipart rejection: {rejection}");
                (
                    StatusCode::BAD_REQUEST,
                    "MALFORMED_UPLOAD",
                    rejection.body_text(),
                    Notice::analysis_failed(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    Notice::analysis_failed(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
                "notice": notice
            }
        }));

        (status, body).into_response()
    }
}
