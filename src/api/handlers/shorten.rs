//! Handler for link shortening endpoint.

use axum::{Json, body::Bytes, extract::State};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL for a long URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// The body is parsed as JSON regardless of `Content-Type`.
///
/// # Request Body
///
/// ```json
/// { "long_url": "https://example.com" }
/// ```
///
/// # Response
///
/// ```json
/// { "short_url": "http://localhost:8080/aZ3k9Q" }
/// ```
///
/// # Errors
///
/// - 400 if the body is not valid JSON or `long_url` is empty
/// - 500 if no unique slug could be stored
pub async fn shorten_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ShortenResponse>, AppError> {
    let payload: ShortenRequest = serde_json::from_slice(&body)
        .map_err(|_| AppError::bad_request("Invalid request body"))?;

    payload.validate()?;

    let mapping = state.link_service.shorten(payload.long_url).await?;

    tracing::info!(slug = %mapping.slug, "short link created");

    Ok(Json(ShortenResponse {
        short_url: state.link_service.short_url(&mapping.slug),
    }))
}
