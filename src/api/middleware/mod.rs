//! HTTP middleware for request processing and protection.
//!
//! Provides client identification, rate limiting, CORS, and observability middleware.

pub mod client_key;
pub mod cors;
pub mod rate_limit;
pub mod tracing;
