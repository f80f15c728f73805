//! Shared application state injected into handlers and middleware.

use axum::http::HeaderValue;
use std::sync::Arc;

use crate::application::services::LinkService;
use crate::infrastructure::rate_limit::RateLimiters;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub limiters: Arc<RateLimiters>,
    /// Value of `Access-Control-Allow-Origin` on shorten responses.
    pub allowed_origin: HeaderValue,
    /// Key clients by `X-Forwarded-For` when present.
    pub trust_forwarded_for: bool,
}

impl AppState {
    pub fn new(
        link_service: Arc<LinkService>,
        limiters: Arc<RateLimiters>,
        allowed_origin: HeaderValue,
        trust_forwarded_for: bool,
    ) -> Self {
        Self {
            link_service,
            limiters,
            allowed_origin,
            trust_forwarded_for,
        }
    }
}
