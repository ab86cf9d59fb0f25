//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use media_toolkit::MediaError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    UnsupportedMedia(String),

    #[error("{0}")]
    Multipart(String),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::UnsupportedMedia(_) | ApiError::Multipart(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Media(e) => media_status(e),
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Map library errors onto HTTP statuses: validation problems are the
/// caller's fault, missing local files are 404, tool and IO failures are
/// server errors.
fn media_status(error: &MediaError) -> StatusCode {
    match error {
        MediaError::NoPagesSelected
        | MediaError::NotAFile(_)
        | MediaError::InvalidFileType { .. }
        | MediaError::UnsupportedImageFormat(_)
        | MediaError::UnsupportedAudioFormat(_)
        | MediaError::UnsupportedResolution { .. }
        | MediaError::UnknownDuration
        | MediaError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        MediaError::FileNotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Standard error response structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message describing what went wrong.
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            error!("request failed: {message}");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
