//! Repository trait for slug → URL mapping storage.

use crate::domain::entities::{NewUrlMapping, UrlMapping};
use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by a [`UrlRepository`].
///
/// A duplicate slug is an expected, recoverable outcome for the shortening
/// retry loop and is kept separate from every other storage failure.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The slug is already taken. Nothing was persisted.
    #[error("slug `{slug}` already exists")]
    DuplicateSlug { slug: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Repository interface for URL mappings.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Inserts a new mapping under the storage uniqueness constraint on `slug`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::DuplicateSlug`] if the slug already exists; the
    /// insert is rejected atomically and leaves no row behind.
    ///
    /// Returns [`StorageError::Database`] on any other failure.
    async fn insert(&self, new_mapping: NewUrlMapping) -> Result<UrlMapping, StorageError>;

    /// Finds a mapping by slug.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Database`] on database errors.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<UrlMapping>, StorageError>;
}
