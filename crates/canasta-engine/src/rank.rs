//! On-demand "best value" ordering for live product listings.
//!
//! Mirrors the best-value reduction in [`crate::aggregate`] but produces a
//! full ordering instead of a single winner. The two share the axis
//! selection and normalization code, so they can never judge the same
//! candidate set on different axes. The tie rules differ: the single-winner
//! reduction absorbs epsilon noise and resolves to the lower product id,
//! while the ordering compares exact unit prices and falls back to raw
//! price — inside an epsilon tie the sort head and the stored winner can
//! be different products.

use std::cmp::Ordering;

use canasta_core::{ComparableType, ComparePreference, Quantity};

use crate::aggregate::Candidate;
use crate::classify::select_target_axis;
use crate::normalize::unit_price;

/// Orders candidates by best value. Performs no I/O and no writes.
///
/// Sort contract: candidates on the target axis with a normalized unit
/// price sort first, ascending by unit price; equal unit prices break by
/// ascending raw price, then product id. Everything else — failed parse,
/// wrong axis, or no usable price — sorts after, ascending by raw price,
/// then product id.
///
/// The comparator is exact (`total_cmp` at every level): an
/// epsilon-tolerant "equal" is not transitive, and `sort_by` requires a
/// strict weak ordering. Epsilon handling stays in the single-winner
/// reduction.
#[must_use]
pub fn rank_by_best_value(
    mut candidates: Vec<Candidate>,
    preference: ComparePreference,
) -> Vec<Candidate> {
    let axis = select_target_axis(
        candidates
            .iter()
            .filter_map(|c| c.quantity.as_ref().map(Quantity::comparable_type)),
        preference,
    );

    candidates.sort_by(|a, b| {
        match (axis_unit_price(a, axis), axis_unit_price(b, axis)) {
            (Some(ua), Some(ub)) => ua
                .total_cmp(&ub)
                .then_with(|| raw_price_cmp(a, b))
                .then_with(|| a.product_id.cmp(&b.product_id)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => raw_price_cmp(a, b).then_with(|| a.product_id.cmp(&b.product_id)),
        }
    });

    candidates
}

/// The candidate's normalized unit price, but only when it sits on the
/// group's target axis.
fn axis_unit_price(candidate: &Candidate, axis: ComparableType) -> Option<f64> {
    let quantity = candidate.quantity.as_ref()?;
    if quantity.comparable_type() != axis {
        return None;
    }
    unit_price(candidate.min_price?, quantity)
}

/// Ascending raw price; candidates without a positive finite price sort
/// last among their bucket.
fn raw_price_cmp(a: &Candidate, b: &Candidate) -> Ordering {
    let pa = a.min_price.filter(|p| p.is_finite() && *p > 0.0);
    let pb = b.min_price.filter(|p| p.is_finite() && *p > 0.0);
    match (pa, pb) {
        (Some(pa), Some(pb)) => pa.total_cmp(&pb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use crate::aggregate::aggregate;

    use super::*;

    fn measured(product_id: i64, price: f64, grams: f64) -> Candidate {
        Candidate {
            product_id,
            min_price: Some(price),
            quantity: Some(Quantity::mass_grams(grams)),
        }
    }

    fn counted(product_id: i64, price: f64, items: f64) -> Candidate {
        Candidate {
            product_id,
            min_price: Some(price),
            quantity: Some(Quantity::count(items)),
        }
    }

    fn unparsed(product_id: i64, price: f64) -> Candidate {
        Candidate {
            product_id,
            min_price: Some(price),
            quantity: None,
        }
    }

    fn ids(candidates: &[Candidate]) -> Vec<i64> {
        candidates.iter().map(|c| c.product_id).collect()
    }

    #[test]
    fn axis_matching_candidates_sort_first_by_unit_price() {
        let ranked = rank_by_best_value(
            vec![
                measured(1, 150.0, 1000.0), // 0.15/g
                measured(2, 140.0, 907.0),  // ~0.1543/g
                counted(3, 90.0, 6.0),      // off-axis (Measure majority)
                unparsed(4, 20.0),
            ],
            ComparePreference::None,
        );
        assert_eq!(ids(&ranked), vec![1, 2, 4, 3]);
    }

    #[test]
    fn non_qualifying_tail_sorts_by_raw_price() {
        let ranked = rank_by_best_value(
            vec![unparsed(1, 50.0), unparsed(2, 10.0), measured(3, 99.0, 100.0)],
            ComparePreference::None,
        );
        assert_eq!(ids(&ranked), vec![3, 2, 1]);
    }

    #[test]
    fn unit_price_tie_breaks_by_raw_price_then_id() {
        // Same 0.10/g unit price; raw prices differ.
        let ranked = rank_by_best_value(
            vec![measured(1, 100.0, 1000.0), measured(2, 50.0, 500.0)],
            ComparePreference::None,
        );
        assert_eq!(ids(&ranked), vec![2, 1]);

        // Identical unit and raw prices: product id decides.
        let ranked = rank_by_best_value(
            vec![measured(9, 50.0, 500.0), measured(4, 50.0, 500.0)],
            ComparePreference::None,
        );
        assert_eq!(ids(&ranked), vec![4, 9]);
    }

    #[test]
    fn missing_price_sorts_last() {
        let ranked = rank_by_best_value(
            vec![
                Candidate {
                    product_id: 1,
                    min_price: None,
                    quantity: None,
                },
                unparsed(2, 5.0),
            ],
            ComparePreference::None,
        );
        assert_eq!(ids(&ranked), vec![2, 1]);
    }

    #[test]
    fn tied_unit_prices_rank_by_raw_price_not_by_winner_id() {
        // Both candidates normalize to exactly 0.10/g. The stored winner
        // resolves the tie to the lower product id; the listing resolves
        // it to the lower raw price, so the two front different products.
        let candidates = vec![measured(1, 100.0, 1000.0), measured(2, 50.0, 500.0)];

        let stat = aggregate(&candidates, ComparePreference::None);
        assert_eq!(stat.best_value.expect("best value").product_id, 1);

        let ranked = rank_by_best_value(candidates, ComparePreference::None);
        assert_eq!(ids(&ranked), vec![2, 1]);
    }

    #[test]
    fn near_tied_unit_prices_sort_reproducibly() {
        // Unit prices a hair apart (well under the winner-selection
        // epsilon) with raw prices pulling the opposite way. The exact
        // comparator orders by unit price and gives the same result for
        // any input order.
        let mut candidates = vec![
            measured(1, 1000.0, 1000.0),  // 1.0 per gram
            measured(2, 999.0, 998.999),  // ~1.0000010 per gram
            measured(3, 998.0, 997.998),  // ~1.0000020 per gram
        ];

        let forward = ids(&rank_by_best_value(
            candidates.clone(),
            ComparePreference::None,
        ));
        candidates.reverse();
        let backward = ids(&rank_by_best_value(candidates, ComparePreference::None));

        assert_eq!(forward, vec![1, 2, 3]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn ranking_head_agrees_with_aggregate_winner() {
        let candidates = vec![
            measured(11, 150.0, 1000.0),
            measured(7, 140.0, 907.184_74),
            counted(5, 90.0, 6.0),
            unparsed(2, 80.0),
            measured(3, 151.0, 1000.0),
        ];
        let stat = aggregate(&candidates, ComparePreference::None);
        let ranked = rank_by_best_value(candidates, ComparePreference::None);

        let winner = stat.best_value.expect("best value");
        assert_eq!(ranked[0].product_id, winner.product_id);
    }

    #[test]
    fn preference_flips_both_ranking_and_aggregate() {
        let candidates = vec![
            measured(1, 100.0, 1000.0),
            measured(2, 110.0, 1000.0),
            counted(3, 60.0, 12.0),
        ];

        let stat = aggregate(&candidates, ComparePreference::Count);
        let ranked = rank_by_best_value(candidates, ComparePreference::Count);
        assert_eq!(ranked[0].product_id, 3);
        assert_eq!(
            ranked[0].product_id,
            stat.best_value.expect("best value").product_id
        );
    }
}
