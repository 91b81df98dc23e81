//! Database operations for `groups` — including the two result columns
//! owned by the comparison engine.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `groups` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GroupRow {
    pub id: i64,
    pub name: String,
    /// URL-safe identifier; also the key into the parser override table.
    pub slug: String,
    pub parent_id: Option<i64>,
    /// Raw preference sentinel as stored; parse with
    /// `ComparePreference::from_raw` before use.
    pub compare_preference: Option<String>,
    pub cheaper_product_id: Option<i64>,
    pub best_value_product_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Returns every group id in the catalog, ordered ascending.
///
/// The batch recompute uses this as the overwrite universe: groups with no
/// qualifying candidates still get their result fields reset.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_group_ids(pool: &PgPool) -> Result<Vec<i64>, DbError> {
    let ids = sqlx::query_scalar::<_, i64>("SELECT id FROM groups ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(ids)
}

/// Fetches a group by its slug, if it exists.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_group_by_slug(pool: &PgPool, slug: &str) -> Result<Option<GroupRow>, DbError> {
    let row = sqlx::query_as::<_, GroupRow>(
        "SELECT id, name, slug, parent_id, compare_preference, \
                cheaper_product_id, best_value_product_id, created_at, updated_at \
         FROM groups \
         WHERE slug = $1",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Overwrites a group's two engine-owned result fields.
///
/// Passing `None` resets a field to NULL; the batch recompute relies on
/// this to clear stale references. The write is idempotent and targets a
/// single row, so no transaction is needed.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the group does not exist, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn update_group_results(
    pool: &PgPool,
    group_id: i64,
    cheaper_product_id: Option<i64>,
    best_value_product_id: Option<i64>,
) -> Result<(), DbError> {
    let rows_affected = sqlx::query(
        "UPDATE groups \
         SET cheaper_product_id = $2, \
             best_value_product_id = $3, \
             updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(group_id)
    .bind(cheaper_product_id)
    .bind(best_value_product_id)
    .execute(pool)
    .await?
    .rows_affected();

    if rows_affected == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
