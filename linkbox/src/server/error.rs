// src/server/error.rs
use crate::application::error::ApplicationError;
use crate::domain::error::DomainError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Error response of every route: a status plus `{"error": message}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "authentication required")
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Body that could not be read as JSON
    pub fn invalid_format() -> Self {
        Self::from(DomainError::InvalidDataFormat)
    }

    /// 413 for bodies over the route's limit, "invalid data format" otherwise
    pub fn from_json_rejection(rejection: &JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::new(StatusCode::PAYLOAD_TOO_LARGE, "request body too large")
        } else {
            Self::invalid_format()
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidDataFormat | DomainError::InvalidBookmarkData => {
                ApiError::bad_request(err.to_string())
            }
            DomainError::InvalidCaller(_) => ApiError::unauthorized(),
            DomainError::BookmarkNotFound(_) => ApiError::new(StatusCode::NOT_FOUND, err.to_string()),
            other => ApiError::internal(other.to_string()),
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Domain(domain) => ApiError::from(domain),
            ApplicationError::Validation(msg) => ApiError::bad_request(msg),
            ApplicationError::Other(msg) => ApiError::internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("Request failed: {}", self.message);
        }
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}
