//! Database error classification.

/// Name of the unique constraint on `urls.slug`.
pub const SLUG_UNIQUE_CONSTRAINT: &str = "urls_slug_key";

/// Returns true if `e` is a unique violation of the slug constraint.
pub fn is_unique_violation_on_slug(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some(SLUG_UNIQUE_CONSTRAINT))
}
