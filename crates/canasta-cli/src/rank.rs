//! Rank command handler: the read-only, on-demand best-value ordering for
//! a single group. Shares the candidate conversion and engine code with
//! the recompute pass, so the listing always judges the group on the same
//! axis as the stored winners.

use std::collections::HashMap;

use canasta_core::{AppConfig, ComparePreference, Quantity};
use canasta_db::CandidateRow;
use canasta_engine::{rank_by_best_value, select_target_axis, unit_price};

use crate::recompute::{load_override_table, to_candidate};

/// Print the best-value ordering for one group.
///
/// # Errors
///
/// Returns an error if the group slug is unknown, the overrides file is
/// malformed, or the snapshot query fails.
pub(crate) async fn run_rank(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    slug: &str,
) -> anyhow::Result<()> {
    let overrides = load_override_table(config)?;

    let group = canasta_db::get_group_by_slug(pool, slug)
        .await?
        .ok_or_else(|| anyhow::anyhow!("group '{slug}' not found"))?;

    let rows = canasta_db::list_candidate_rows_for_group(pool, slug).await?;
    if rows.is_empty() {
        println!("group {slug}: no products");
        return Ok(());
    }

    let preference = ComparePreference::from_raw(group.compare_preference.as_deref());
    let by_product: HashMap<i64, &CandidateRow> =
        rows.iter().map(|r| (r.product_id, r)).collect();
    let candidates: Vec<_> = rows.iter().map(|r| to_candidate(r, &overrides)).collect();

    let axis = select_target_axis(
        candidates
            .iter()
            .filter_map(|c| c.quantity.as_ref().map(Quantity::comparable_type)),
        preference,
    );
    let ranked = rank_by_best_value(candidates, preference);

    println!("group {slug}: {} products, axis {axis}", ranked.len());
    for (position, candidate) in ranked.iter().enumerate() {
        let unit_text = by_product
            .get(&candidate.product_id)
            .and_then(|r| r.unit.as_deref())
            .unwrap_or("-");
        let price = candidate
            .min_price
            .map_or_else(|| "-".to_string(), |p| format!("{p:.2}"));
        let normalized = candidate
            .quantity
            .as_ref()
            .filter(|q| q.comparable_type() == axis)
            .and_then(|q| candidate.min_price.and_then(|p| unit_price(p, q)))
            .map_or_else(|| "-".to_string(), |u| format!("{u:.6}"));

        println!(
            "{:>3}. product {:<8} unit {:<20} price {:>8} per-base {normalized}",
            position + 1,
            candidate.product_id,
            unit_text,
            price
        );
    }

    Ok(())
}
