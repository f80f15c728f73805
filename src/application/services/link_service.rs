//! Link creation and resolution service.

use std::sync::Arc;

use crate::domain::entities::{NewUrlMapping, UrlMapping};
use crate::domain::repositories::{StorageError, UrlRepository};
use crate::domain::slug::{self, RandomSource};
use crate::error::AppError;

/// Length of the first slug candidate.
pub const INITIAL_SLUG_LENGTH: usize = 6;

/// Storage attempts per shorten request.
pub const MAX_ATTEMPTS: usize = 5;

/// Service for creating and resolving short links.
///
/// Shortening generates a random slug and lets the storage uniqueness
/// constraint arbitrate collisions. Each collision makes the next candidate
/// one character longer, which shrinks the collision probability by a factor
/// of 62 per retry.
pub struct LinkService {
    repository: Arc<dyn UrlRepository>,
    random: Arc<dyn RandomSource>,
    base_url: String,
}

impl LinkService {
    /// Creates a new link service.
    ///
    /// `base_url` is the prefix for generated short links; a trailing `/` is ignored.
    pub fn new(
        repository: Arc<dyn UrlRepository>,
        random: Arc<dyn RandomSource>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            random,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Persists `long_url` under a freshly generated unique slug.
    ///
    /// # Errors
    ///
    /// - [`AppError::SlugSpaceExhausted`] after [`MAX_ATTEMPTS`] collisions
    /// - [`AppError::Storage`] on any non-collision storage failure (not retried)
    /// - [`AppError::Slug`] if the secure random source fails
    pub async fn shorten(&self, long_url: String) -> Result<UrlMapping, AppError> {
        let mut length = INITIAL_SLUG_LENGTH;

        for attempt in 1..=MAX_ATTEMPTS {
            let candidate = slug::generate(self.random.as_ref(), length)?;

            let new_mapping = NewUrlMapping {
                slug: candidate,
                long_url: long_url.clone(),
            };

            match self.repository.insert(new_mapping).await {
                Ok(mapping) => return Ok(mapping),
                Err(StorageError::DuplicateSlug { slug }) => {
                    tracing::warn!(attempt, %slug, length, "slug collision, retrying");
                    length += 1;
                }
                Err(e) => {
                    tracing::error!(attempt, error = %e, "failed to store url mapping");
                    return Err(e.into());
                }
            }
        }

        tracing::error!(
            attempts = MAX_ATTEMPTS,
            "failed to generate unique slug after retries"
        );

        Err(AppError::SlugSpaceExhausted {
            attempts: MAX_ATTEMPTS,
        })
    }

    /// Resolves a slug to its stored mapping. Read-only.
    ///
    /// Malformed slugs are reported as not found without touching storage.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no mapping exists.
    /// Returns [`AppError::Storage`] on database errors.
    pub async fn resolve(&self, slug: &str) -> Result<UrlMapping, AppError> {
        if !slug::is_well_formed(slug) {
            return Err(AppError::NotFound);
        }

        self.repository
            .find_by_slug(slug)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Builds the fully qualified short URL for a slug.
    pub fn short_url(&self, slug: &str) -> String {
        format!("{}/{}", self.base_url, slug)
    }
}
