//! Per-client rate limiting middleware.
//!
//! Each endpoint class has its own [`LimiterRegistry`]; the decision is
//! immediate and never queues. Denied requests receive `429 Too Many Requests`.
//!
//! # Example
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/shorten", post(shorten_handler))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit::shorten));
//! ```

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;

use crate::api::middleware::client_key::resolve_client_key;
use crate::error::AppError;
use crate::infrastructure::rate_limit::LimiterRegistry;
use crate::state::AppState;

/// Admission control for the write class (`POST /shorten`).
pub async fn shorten(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    admit(&state.limiters.shorten, &state, &req)?;
    Ok(next.run(req).await)
}

/// Admission control for the read class (`GET /` and `GET /{slug}`).
pub async fn redirect(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    admit(&state.limiters.redirect, &state, &req)?;
    Ok(next.run(req).await)
}

fn admit(registry: &LimiterRegistry, state: &AppState, req: &Request) -> Result<(), AppError> {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let client_key = resolve_client_key(req.headers(), peer, state.trust_forwarded_for);

    if registry.allow(&client_key) {
        Ok(())
    } else {
        tracing::debug!(class = registry.class(), %client_key, "rate limit exceeded");
        Err(AppError::RateLimited)
    }
}
