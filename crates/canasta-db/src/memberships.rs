//! The candidate snapshot: group membership rows joined with each
//! product's reduced minimum price.
//!
//! This query is the upstream "price reduction" collaborator: retailer
//! visibility filtering (`is_active`, `is_hidden`, positive price) happens
//! here, so the engine only ever sees one optional minimum price per
//! membership row.

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

/// One product-group membership row as consumed by the engine.
///
/// `min_price` is `NUMERIC(12,2)` at the boundary and `None` when the
/// product currently has no qualifying price observation. Conversion to
/// `f64` happens in the orchestrator — a documented precision boundary.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CandidateRow {
    pub group_id: i64,
    pub group_slug: String,
    pub compare_preference: Option<String>,
    pub product_id: i64,
    /// Raw free-text unit string from the catalog, e.g. `"500 g"`.
    pub unit: Option<String>,
    pub min_price: Option<Decimal>,
}

const CANDIDATE_SELECT: &str = "SELECT g.id AS group_id, \
            g.slug AS group_slug, \
            g.compare_preference, \
            p.id AS product_id, \
            p.unit, \
            MIN(pr.price) FILTER (WHERE pr.is_active AND NOT pr.is_hidden AND pr.price > 0) \
                AS min_price \
     FROM groups g \
     JOIN group_products gp ON gp.group_id = g.id \
     JOIN products p ON p.id = gp.product_id AND NOT p.is_deleted";

const CANDIDATE_GROUP_BY: &str = " GROUP BY g.id, g.slug, g.compare_preference, p.id, p.unit \
     ORDER BY g.id, p.id";

/// Loads the full candidate snapshot for a batch recompute: one row per
/// non-deleted product per group, with the product's minimum
/// currently-active, non-hidden, positive price (or NULL).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_candidate_rows(pool: &PgPool) -> Result<Vec<CandidateRow>, DbError> {
    let sql = format!("{CANDIDATE_SELECT} LEFT JOIN prices pr ON pr.product_id = p.id{CANDIDATE_GROUP_BY}");
    let rows = sqlx::query_as::<_, CandidateRow>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Loads the candidate rows for a single group slug — the on-demand
/// ranking path.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_candidate_rows_for_group(
    pool: &PgPool,
    slug: &str,
) -> Result<Vec<CandidateRow>, DbError> {
    let sql = format!(
        "{CANDIDATE_SELECT} LEFT JOIN prices pr ON pr.product_id = p.id \
         WHERE g.slug = $1{CANDIDATE_GROUP_BY}"
    );
    let rows = sqlx::query_as::<_, CandidateRow>(&sql)
        .bind(slug)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}
