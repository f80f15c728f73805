//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /shorten` - Create a short link (write rate limit, CORS)
//! - `GET  /{slug}`  - Redirect to the stored URL (read rate limit)
//! - `GET  /`        - Service identification string (read rate limit)
//! - anything else   - 404 (read rate limit)
//!
//! # Middleware order on `/shorten` (outer → inner)
//!
//! CORS (answers `OPTIONS`) → write-class rate limit → method routing (405) → handler.

use crate::api::handlers::{index_handler, not_found_handler, redirect_handler, shorten_handler};
use crate::api::middleware::{cors, rate_limit, tracing};
use crate::state::AppState;
use axum::routing::{get, post};
use axum::{Router, middleware};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    let shorten = post(shorten_handler)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::shorten,
        ))
        .layer(middleware::from_fn_with_state(state.clone(), cors::layer));

    let redirects = Router::new()
        .route("/", get(index_handler))
        .route("/{slug}", get(redirect_handler))
        .fallback(not_found_handler)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::redirect,
        ));

    Router::new()
        .route("/shorten", shorten)
        .merge(redirects)
        .with_state(state)
        .layer(tracing::layer())
}
