//! Domain layer containing business entities and logic.
//!
//! - [`entities`] - Core data structures
//! - [`repositories`] - Data access trait definitions
//! - [`slug`] - Secure random slug generation
//!
//! The domain layer has no dependencies on the HTTP or persistence layers;
//! repository traits define the contracts the infrastructure layer implements.

pub mod entities;
pub mod repositories;
pub mod slug;
