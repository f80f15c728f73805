//! Infrastructure layer for external integrations and process-local state.
//!
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`rate_limit`] - Per-client token bucket registries

pub mod persistence;
pub mod rate_limit;
