//! URL mapping entity: a persisted slug and the long URL it resolves to.

use chrono::{DateTime, Utc};

/// A stored slug → long URL mapping.
///
/// Created exactly once per successful shorten request and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlMapping {
    pub id: i64,
    pub slug: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
}

impl UrlMapping {
    /// Creates a new UrlMapping instance.
    pub fn new(id: i64, slug: String, long_url: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            slug,
            long_url,
            created_at,
        }
    }
}

/// Input data for inserting a new mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlMapping {
    pub slug: String,
    pub long_url: String,
}
