//! Per-group reductions: absolute cheapest and best normalized value.

use canasta_core::{ComparePreference, Quantity};

use crate::classify::select_target_axis;
use crate::normalize::unit_price;

/// Prices within this distance are tied; ties resolve to the lower product
/// id. Absorbs floating-point noise from currency arithmetic.
pub const PRICE_EPSILON: f64 = 1e-6;

/// One group member as seen by the aggregation pass: the product, its
/// reduced minimum price across retailers (if it has one), and its parsed
/// quantity (if its unit string parsed).
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub product_id: i64,
    pub min_price: Option<f64>,
    pub quantity: Option<Quantity>,
}

/// A reduction winner: the product and the price it won with (raw price
/// for cheapest, normalized unit price for best value).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Winner {
    pub product_id: i64,
    pub price: f64,
}

/// The result of one aggregation pass over a group.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GroupStat {
    pub cheaper: Option<Winner>,
    pub best_value: Option<Winner>,
}

/// Runs both reductions over a group's candidates.
///
/// - **Cheapest** is axis-independent: the lowest positive finite raw
///   price, whether or not the unit string parsed.
/// - **Best value** selects the group's target axis over the classified
///   candidates, then takes the lowest normalized unit price on that axis.
///
/// Both reductions share the epsilon/lower-id tie-break in [`prefer`]
/// so they cannot drift apart. Empty reductions yield `None`.
#[must_use]
pub fn aggregate(candidates: &[Candidate], preference: ComparePreference) -> GroupStat {
    let mut stat = GroupStat::default();

    for candidate in candidates {
        if let Some(price) = valid_price(candidate.min_price) {
            prefer(&mut stat.cheaper, candidate.product_id, price);
        }
    }

    let axis = select_target_axis(
        candidates
            .iter()
            .filter_map(|c| c.quantity.as_ref().map(Quantity::comparable_type)),
        preference,
    );

    for candidate in candidates {
        let Some(quantity) = candidate.quantity.as_ref() else {
            continue;
        };
        if quantity.comparable_type() != axis {
            continue;
        }
        let Some(price) = valid_price(candidate.min_price) else {
            continue;
        };
        if let Some(normalized) = unit_price(price, quantity) {
            prefer(&mut stat.best_value, candidate.product_id, normalized);
        }
    }

    stat
}

/// Replaces the current winner when `price` is strictly lower by more than
/// [`PRICE_EPSILON`], or tied within it with a lower product id.
///
/// The cheapest and best-value tie-breaks intentionally share this one
/// rule; see DESIGN.md.
fn prefer(current: &mut Option<Winner>, product_id: i64, price: f64) {
    match current {
        None => *current = Some(Winner { product_id, price }),
        Some(winner) => {
            let strictly_lower = price < winner.price - PRICE_EPSILON;
            let tied = (price - winner.price).abs() <= PRICE_EPSILON;
            if strictly_lower || (tied && product_id < winner.product_id) {
                *current = Some(Winner { product_id, price });
            }
        }
    }
}

fn valid_price(price: Option<f64>) -> Option<f64> {
    price.filter(|p| p.is_finite() && *p > 0.0)
}

#[cfg(test)]
mod tests {
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

    #[test]
    fn rice_group_end_to_end() {
        // P1 "1 kg" @ 150, P2 "2 lb" @ 140, P3 "paquete x6" @ 90.
        // Majority Measure; best value P1 (0.15/g beats ~0.1543/g);
        // cheapest is raw-price P3.
        let candidates = vec![
            measured(1, 150.0, 1000.0),
            measured(2, 140.0, 907.184_74),
            counted(3, 90.0, 6.0),
        ];
        let stat = aggregate(&candidates, ComparePreference::None);

        let cheaper = stat.cheaper.expect("cheapest");
        assert_eq!(cheaper.product_id, 3);
        assert!((cheaper.price - 90.0).abs() < 1e-9);

        let best = stat.best_value.expect("best value");
        assert_eq!(best.product_id, 1);
        assert!((best.price - 0.15).abs() < 1e-9);
    }

    #[test]
    fn deterministic_under_reordering() {
        let mut candidates = vec![
            measured(7, 99.0, 500.0),
            measured(3, 99.0, 500.0),
            counted(9, 50.0, 4.0),
            unparsed(11, 45.0),
        ];
        let forward = aggregate(&candidates, ComparePreference::None);
        candidates.reverse();
        let reversed = aggregate(&candidates, ComparePreference::None);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn epsilon_tie_resolves_to_lower_product_id() {
        let candidates = vec![
            measured(20, 10.000_000_5, 1000.0),
            measured(10, 10.0, 1000.0),
        ];
        let stat = aggregate(&candidates, ComparePreference::None);
        assert_eq!(stat.cheaper.expect("cheapest").product_id, 10);
        assert_eq!(stat.best_value.expect("best value").product_id, 10);
    }

    #[test]
    fn difference_above_epsilon_is_not_a_tie() {
        let candidates = vec![
            measured(10, 10.01, 1000.0),
            measured(20, 10.0, 1000.0),
        ];
        let stat = aggregate(&candidates, ComparePreference::None);
        assert_eq!(stat.cheaper.expect("cheapest").product_id, 20);
    }

    #[test]
    fn unparseable_candidate_can_win_cheapest_but_never_best_value() {
        let candidates = vec![unparsed(5, 10.0), measured(6, 50.0, 1000.0)];
        let stat = aggregate(&candidates, ComparePreference::None);
        assert_eq!(stat.cheaper.expect("cheapest").product_id, 5);
        assert_eq!(stat.best_value.expect("best value").product_id, 6);
    }

    #[test]
    fn preference_switches_best_value_axis() {
        let candidates = vec![
            measured(1, 100.0, 1000.0),
            measured(2, 110.0, 1000.0),
            counted(3, 120.0, 12.0),
        ];

        let no_pref = aggregate(&candidates, ComparePreference::None);
        // Measure majority (2 > 1) without a preference.
        assert_eq!(no_pref.best_value.expect("best value").product_id, 1);

        let count_pref = aggregate(&candidates, ComparePreference::Count);
        assert_eq!(count_pref.best_value.expect("best value").product_id, 3);
    }

    #[test]
    fn off_axis_candidates_are_excluded_from_best_value() {
        // Two measures and one count: axis is Measure; the count candidate
        // has a far better per-item price but must not win.
        let candidates = vec![
            measured(1, 100.0, 100.0),
            measured(2, 100.0, 200.0),
            counted(3, 1.0, 100.0),
        ];
        let stat = aggregate(&candidates, ComparePreference::None);
        assert_eq!(stat.best_value.expect("best value").product_id, 2);
    }

    #[test]
    fn invalid_prices_are_excluded_from_both_reductions() {
        let candidates = vec![
            Candidate {
                product_id: 1,
                min_price: Some(0.0),
                quantity: Some(Quantity::mass_grams(100.0)),
            },
            Candidate {
                product_id: 2,
                min_price: Some(f64::NAN),
                quantity: Some(Quantity::mass_grams(100.0)),
            },
            Candidate {
                product_id: 3,
                min_price: None,
                quantity: Some(Quantity::mass_grams(100.0)),
            },
        ];
        let stat = aggregate(&candidates, ComparePreference::None);
        assert!(stat.cheaper.is_none());
        assert!(stat.best_value.is_none());
    }

    #[test]
    fn empty_group_yields_empty_stat() {
        let stat = aggregate(&[], ComparePreference::None);
        assert!(stat.cheaper.is_none());
        assert!(stat.best_value.is_none());
    }
}
