//! Application layer services implementing business logic.
//!
//! Services consume repository traits and expose a small API for HTTP handlers.
//!
//! - [`services::link_service::LinkService`] - Slug generation with collision retry, and resolution
pub mod services;
