//! Core domain entities.
//!
//! Entities are plain data structures without business logic. Creation input
//! lives in a separate `New*` struct, so the persisted form always carries
//! its storage-assigned id and timestamp.

pub mod url_mapping;

pub use url_mapping::{NewUrlMapping, UrlMapping};
