//! JSON error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use weekend_warrior_collector::ErrorKind;

/// An error returned to the client as `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    /// Client-facing message for a failed stats lookup
    pub fn from_lookup(kind: ErrorKind) -> Self {
        let message = match kind {
            ErrorKind::InvalidInput => "Invalid GitHub username format",
            ErrorKind::NotFound => "User not found",
            ErrorKind::RateLimited => "GitHub API rate limit exceeded. Please try again later.",
            ErrorKind::Misconfigured => "GitHub API configuration error",
            ErrorKind::Unknown => "Failed to fetch GitHub stats",
        };
        Self::new(kind, message)
    }

    pub fn status(&self) -> StatusCode {
        match self.kind {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ErrorKind::Misconfigured | ErrorKind::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}
