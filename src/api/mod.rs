//! HTTP layer translating requests into service calls.
//!
//! - [`dto`] - Request/response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Rate limiting, CORS, and tracing middleware

pub mod dto;
pub mod handlers;
pub mod middleware;
