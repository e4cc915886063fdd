//! Mapping of [`MoodlogError`] onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::MoodlogError;

/// JSON body sent with every error status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl MoodlogError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            MoodlogError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            MoodlogError::NotFound(_) | MoodlogError::UserNotFound(_) => StatusCode::NOT_FOUND,
            MoodlogError::Forbidden => StatusCode::FORBIDDEN,
            MoodlogError::Unauthorized => StatusCode::UNAUTHORIZED,
            MoodlogError::UserExists(_) => StatusCode::CONFLICT,
            MoodlogError::InvalidMonth(_)
            | MoodlogError::InvalidCollisionPolicy(_)
            | MoodlogError::InvalidAddress(_) => StatusCode::BAD_REQUEST,
            MoodlogError::NotInitialized(_)
            | MoodlogError::AlreadyInitialized(_)
            | MoodlogError::Storage(_)
            | MoodlogError::Io(_)
            | MoodlogError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for MoodlogError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
