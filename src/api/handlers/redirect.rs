//! Handlers for short URL redirect and the service root.

use axum::{
    extract::{Path, State, rejection::PathRejection},
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};

use crate::error::AppError;
use crate::state::AppState;

/// Identification string served at `/`.
pub const SERVICE_BANNER: &str = "URL Shortener API";

/// Redirects a slug to its original URL.
///
/// # Endpoint
///
/// `GET /{slug}`
///
/// # Errors
///
/// Returns 404 Not Found if the slug doesn't exist or does not decode.
/// Returns 500 on storage errors.
pub async fn redirect_handler(
    slug: Result<Path<String>, PathRejection>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let Ok(Path(slug)) = slug else {
        return Err(AppError::NotFound);
    };

    let mapping = state.link_service.resolve(&slug).await?;

    let location = HeaderValue::try_from(mapping.long_url).map_err(|e| {
        AppError::Internal(format!("stored url for `{slug}` is not a valid header: {e}"))
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]))
}

/// Returns the service identification string.
///
/// # Endpoint
///
/// `GET /`
pub async fn index_handler() -> &'static str {
    SERVICE_BANNER
}

/// Answers every path no route matches.
pub async fn not_found_handler() -> AppError {
    AppError::NotFound
}
