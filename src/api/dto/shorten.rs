//! DTOs for link shortening endpoint.

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

/// Request to shorten a URL.
///
/// A missing `long_url` deserializes as empty and fails validation with the
/// same message as an explicit empty string.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "URL is required"),
        custom(function = validate_redirect_target)
    )]
    pub long_url: String,
}

/// The stored URL is sent back verbatim as `Location`, so it must be a valid
/// header value (no control characters).
fn validate_redirect_target(long_url: &str) -> Result<(), ValidationError> {
    HeaderValue::from_str(long_url).map(|_| ()).map_err(|_| {
        ValidationError::new("invalid_url")
            .with_message(Cow::Borrowed("URL contains invalid characters"))
    })
}

/// Response carrying the fully qualified short URL.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub short_url: String,
}
