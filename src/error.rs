//! Application error taxonomy and its HTTP mapping.
//!
//! Every error renders as `{"error": "<message>"}`. Server-side failures are
//! logged with full detail, while the client only ever sees a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::repositories::StorageError;
use crate::domain::slug::SlugError;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing client input.
    #[error("{0}")]
    Validation(String),

    #[error("short link not found")]
    NotFound,

    /// Admission denied by a rate limiter.
    #[error("too many requests")]
    RateLimited,

    /// Every slug candidate collided; the retry budget is spent.
    #[error("no unique slug after {attempts} attempts")]
    SlugSpaceExhausted { attempts: usize },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Slug(#[from] SlugError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::SlugSpaceExhausted { .. }
            | AppError::Storage(_)
            | AppError::Slug(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the client.
    fn public_message(&self) -> String {
        match self {
            AppError::Validation(message) => message.clone(),
            AppError::NotFound => "Not Found".to_string(),
            AppError::RateLimited => "Too Many Requests".to_string(),
            AppError::SlugSpaceExhausted { .. } | AppError::Slug(_) => {
                "Failed to shorten URL".to_string()
            }
            AppError::Storage(_) | AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Invalid request body".to_string());

        AppError::Validation(message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ErrorBody {
            error: self.public_message(),
        };

        (status, Json(body)).into_response()
    }
}
