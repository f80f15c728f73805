//! Client identification for rate limiting.
//!
//! Best effort only, not authentication. `X-Forwarded-For` is supplied by the
//! client unless a trusted reverse proxy overwrites it, so trusting it lets a
//! client pick its own key. Deployments without such a proxy should set
//! `TRUST_FORWARDED_FOR=false`.

use axum::http::HeaderMap;
use std::net::SocketAddr;

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Key used when neither a header nor a peer address is available.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Derives the rate-limit key for a request.
///
/// Uses the first `X-Forwarded-For` entry when `trust_forwarded_for` is set
/// and the header is non-empty, else the peer IP (port dropped).
pub fn resolve_client_key(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_forwarded_for: bool,
) -> String {
    if trust_forwarded_for {
        let forwarded = headers
            .get(X_FORWARDED_FOR)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        if let Some(client) = forwarded {
            return client.to_string();
        }
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}
