//! PostgreSQL implementation of the URL mapping repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewUrlMapping, UrlMapping};
use crate::domain::repositories::{StorageError, UrlRepository};
use crate::utils::db_error::is_unique_violation_on_slug;

/// PostgreSQL repository for URL mappings.
///
/// Relies on the `urls_slug_key` unique constraint to reject duplicate slugs
/// atomically.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UrlRow {
    id: i64,
    slug: String,
    long_url: String,
    created_at: DateTime<Utc>,
}

impl From<UrlRow> for UrlMapping {
    fn from(row: UrlRow) -> Self {
        UrlMapping::new(row.id, row.slug, row.long_url, row.created_at)
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn insert(&self, new_mapping: NewUrlMapping) -> Result<UrlMapping, StorageError> {
        let inserted = sqlx::query_as::<_, UrlRow>(
            r#"
            INSERT INTO urls (slug, long_url)
            VALUES ($1, $2)
            RETURNING id, slug, long_url, created_at
            "#,
        )
        .bind(&new_mapping.slug)
        .bind(&new_mapping.long_url)
        .fetch_one(self.pool.as_ref())
        .await;

        match inserted {
            Ok(row) => Ok(row.into()),
            Err(e) if is_unique_violation_on_slug(&e) => Err(StorageError::DuplicateSlug {
                slug: new_mapping.slug,
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<UrlMapping>, StorageError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            SELECT id, slug, long_url, created_at
            FROM urls
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlMapping::from))
    }
}
