//! Recompute command handlers for the CLI.
//!
//! The full pass is the scheduled entry point: it snapshots the whole
//! catalog, aggregates every group in memory, then overwrites every group's
//! result fields. Groups that end up with no qualifying candidates are
//! reset to NULL, never left stale. Per-group write failures are logged
//! and skipped rather than propagated so a single bad group does not abort
//! the run.

use std::collections::BTreeMap;

use futures::StreamExt;
use rust_decimal::prelude::ToPrimitive;

use canasta_core::{AppConfig, ComparePreference, OverrideTable};
use canasta_db::CandidateRow;
use canasta_engine::{aggregate, Candidate, GroupStat};

#[derive(Debug, Default)]
pub(crate) struct RecomputeSummary {
    pub groups_total: usize,
    pub groups_with_candidates: usize,
    pub groups_updated: usize,
    pub groups_failed: usize,
}

/// Load the parser override table from the configured path.
///
/// A missing file is not an error; every group then falls through to the
/// generic parser.
pub(crate) fn load_override_table(config: &AppConfig) -> anyhow::Result<OverrideTable> {
    if config.overrides_path.exists() {
        Ok(canasta_core::load_overrides(&config.overrides_path)?)
    } else {
        tracing::debug!(
            path = %config.overrides_path.display(),
            "overrides file not found; using empty table"
        );
        Ok(OverrideTable::empty())
    }
}

/// Convert one snapshot row into an engine candidate: decimal price to
/// float, unit text through the parser with the group's overrides. Parse
/// failures become `None`, which the engine treats as "cheapest-eligible
/// only".
pub(crate) fn to_candidate(row: &CandidateRow, overrides: &OverrideTable) -> Candidate {
    let quantity = row.unit.as_deref().and_then(|unit| {
        canasta_engine::parse_quantity(unit, overrides.rules_for(&row.group_slug))
    });
    Candidate {
        product_id: row.product_id,
        min_price: row.min_price.and_then(|price| price.to_f64()),
        quantity,
    }
}

/// Recompute winners for one group or the whole catalog.
///
/// When `dry_run` is `true` the results are printed and nothing is written.
///
/// # Errors
///
/// Returns an error if the group filter resolves to nothing, the overrides
/// file is malformed, or the snapshot queries fail. Per-group write
/// failures in the full pass are logged and counted, not propagated.
pub(crate) async fn run_recompute(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    group_filter: Option<&str>,
    dry_run: bool,
) -> anyhow::Result<RecomputeSummary> {
    let overrides = load_override_table(config)?;

    if let Some(slug) = group_filter {
        return recompute_single_group(pool, &overrides, slug, dry_run).await;
    }

    let rows = canasta_db::list_candidate_rows(pool).await?;
    let group_ids = canasta_db::list_group_ids(pool).await?;

    let mut by_group: BTreeMap<i64, (ComparePreference, Vec<Candidate>)> = BTreeMap::new();
    for row in &rows {
        let entry = by_group.entry(row.group_id).or_insert_with(|| {
            (
                ComparePreference::from_raw(row.compare_preference.as_deref()),
                Vec::new(),
            )
        });
        entry.1.push(to_candidate(row, &overrides));
    }

    let mut summary = RecomputeSummary {
        groups_total: group_ids.len(),
        groups_with_candidates: by_group.len(),
        ..RecomputeSummary::default()
    };

    // Every known group gets a write, including groups absent from the
    // snapshot: their winners reset to NULL.
    let work: Vec<(i64, GroupStat)> = group_ids
        .iter()
        .map(|&group_id| {
            let stat = by_group
                .get(&group_id)
                .map_or_else(GroupStat::default, |(preference, candidates)| {
                    aggregate(candidates, *preference)
                });
            (group_id, stat)
        })
        .collect();

    if dry_run {
        for (group_id, stat) in &work {
            println!("dry-run: group {group_id}: {}", describe_stat(*stat));
        }
        println!(
            "dry-run: {} groups total, {} with candidates",
            summary.groups_total, summary.groups_with_candidates
        );
        return Ok(summary);
    }

    let concurrency = config.recompute_concurrency.max(1);
    let mut writes = futures::stream::iter(work.into_iter().map(|(group_id, stat)| async move {
        let result = canasta_db::update_group_results(
            pool,
            group_id,
            stat.cheaper.map(|w| w.product_id),
            stat.best_value.map(|w| w.product_id),
        )
        .await;
        (group_id, result)
    }))
    .buffer_unordered(concurrency);

    while let Some((group_id, result)) = writes.next().await {
        match result {
            Ok(()) => summary.groups_updated += 1,
            Err(e) => {
                summary.groups_failed += 1;
                tracing::error!(group_id, error = %e, "failed to write group results");
            }
        }
    }

    println!(
        "recomputed {} of {} groups ({} with candidates, {} failed)",
        summary.groups_updated,
        summary.groups_total,
        summary.groups_with_candidates,
        summary.groups_failed
    );

    Ok(summary)
}

async fn recompute_single_group(
    pool: &sqlx::PgPool,
    overrides: &OverrideTable,
    slug: &str,
    dry_run: bool,
) -> anyhow::Result<RecomputeSummary> {
    let group = canasta_db::get_group_by_slug(pool, slug)
        .await?
        .ok_or_else(|| anyhow::anyhow!("group '{slug}' not found"))?;

    let rows = canasta_db::list_candidate_rows_for_group(pool, slug).await?;
    let preference = ComparePreference::from_raw(group.compare_preference.as_deref());
    let candidates: Vec<Candidate> = rows.iter().map(|r| to_candidate(r, overrides)).collect();

    let stat = aggregate(&candidates, preference);

    let mut summary = RecomputeSummary {
        groups_total: 1,
        groups_with_candidates: usize::from(!candidates.is_empty()),
        ..RecomputeSummary::default()
    };

    if dry_run {
        println!("dry-run: group {slug}: {}", describe_stat(stat));
        return Ok(summary);
    }

    canasta_db::update_group_results(
        pool,
        group.id,
        stat.cheaper.map(|w| w.product_id),
        stat.best_value.map(|w| w.product_id),
    )
    .await?;
    summary.groups_updated = 1;

    println!("group {slug}: {}", describe_stat(stat));
    Ok(summary)
}

fn describe_stat(stat: GroupStat) -> String {
    let cheaper = stat
        .cheaper
        .map_or_else(|| "none".to_string(), |w| w.product_id.to_string());
    let best_value = stat
        .best_value
        .map_or_else(|| "none".to_string(), |w| w.product_id.to_string());
    format!("cheaper={cheaper} best_value={best_value}")
}
