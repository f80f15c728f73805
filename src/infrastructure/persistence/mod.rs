//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx.
//!
//! - [`PgUrlRepository`] - Slug → URL mapping storage and lookup

pub mod pg_url_repository;

pub use pg_url_repository::PgUrlRepository;
