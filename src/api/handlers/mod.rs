//! HTTP request handlers for API endpoints.

pub mod redirect;
pub mod shorten;

pub use redirect::{index_handler, not_found_handler, redirect_handler};
pub use shorten::shorten_handler;
