//! Comparison-axis classification and group-level axis selection.

use canasta_core::{ComparableType, ComparePreference, Quantity};

/// Maps a parsed quantity onto its comparison axis: mass and volume
/// collapse into `Measure`, discrete items are `Count`.
#[must_use]
pub fn classify(quantity: &Quantity) -> ComparableType {
    quantity.comparable_type()
}

/// Picks the single axis a group is judged on for one aggregation pass.
///
/// Decision order (first matching rule wins):
/// 1. the group explicitly prefers count and at least one candidate is
///    `Count` → `Count`;
/// 2. strict measure majority → `Measure`;
/// 3. any count candidate → `Count`;
/// 4. default → `Measure` (covers the degenerate case where nothing
///    classified; an axis must still be returned).
///
/// Manual preference beating raw majority is user-visible policy — do not
/// reorder these rules. Note the asymmetry: an equal nonzero tally falls
/// through rule 2 and selects `Count` at rule 3.
#[must_use]
pub fn select_target_axis<I>(classified: I, preference: ComparePreference) -> ComparableType
where
    I: IntoIterator<Item = ComparableType>,
{
    let mut measures = 0usize;
    let mut counts = 0usize;
    for candidate in classified {
        match candidate {
            ComparableType::Measure => measures += 1,
            ComparableType::Count => counts += 1,
        }
    }

    if preference.wants_count() && counts > 0 {
        ComparableType::Count
    } else if measures > counts {
        ComparableType::Measure
    } else if counts > 0 {
        ComparableType::Count
    } else {
        ComparableType::Measure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ComparableType::{Count, Measure};

    #[test]
    fn classify_maps_families_to_axes() {
        assert_eq!(classify(&Quantity::mass_grams(500.0)), Measure);
        assert_eq!(classify(&Quantity::volume_ml(355.0)), Measure);
        assert_eq!(classify(&Quantity::count(12.0)), Count);
    }

    #[test]
    fn measure_majority_wins_without_preference() {
        let axis = select_target_axis(
            [Measure, Measure, Measure, Count, Count],
            ComparePreference::None,
        );
        assert_eq!(axis, Measure);
    }

    #[test]
    fn count_majority_wins_without_preference() {
        let axis = select_target_axis([Measure, Count, Count], ComparePreference::None);
        assert_eq!(axis, Count);
    }

    #[test]
    fn nonzero_tie_falls_through_to_count() {
        // Rule 2 requires a strict measure majority; a 1-1 tally reaches
        // rule 3 and selects Count.
        let axis = select_target_axis([Measure, Count], ComparePreference::None);
        assert_eq!(axis, Count);
    }

    #[test]
    fn preference_overrides_measure_majority() {
        let axis = select_target_axis([Measure, Measure, Count], ComparePreference::Count);
        assert_eq!(axis, Count);
    }

    #[test]
    fn preference_without_count_candidates_is_ignored() {
        let axis = select_target_axis([Measure, Measure], ComparePreference::Count);
        assert_eq!(axis, Measure);
    }

    #[test]
    fn empty_candidates_default_to_measure() {
        let axis = select_target_axis(std::iter::empty(), ComparePreference::None);
        assert_eq!(axis, Measure);
        let axis = select_target_axis(std::iter::empty(), ComparePreference::Count);
        assert_eq!(axis, Measure);
    }
}
