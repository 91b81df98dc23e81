//! Free-text unit parsing into typed [`Quantity`] values.
//!
//! Unit strings are uncontrolled catalog input (`"500 g"`, `"1 lb"`,
//! `"paquete x12"`, `"0,5 L"`); failure to parse is an expected outcome,
//! not an error — the product simply cannot participate in unit-normalized
//! comparison. Per-group overrides (see [`canasta_core::overrides`]) are
//! consulted before the generic rule list.

use canasta_core::{OverrideRule, Quantity};

use crate::units;

/// Parses a raw unit string into a typed quantity.
///
/// `overrides` are the rules configured for the owning group's slug, if
/// any; the first matching override wins outright. The generic rules are
/// then tried in priority order:
///
/// 1. adjacent multipack notation (`"x12"`, `"12x"`);
/// 2. a number followed by a mass/volume unit token (normalized to grams
///    or milliliters);
/// 3. a number followed by an item word (`"12 unidades"`);
/// 4. a pack word plus a bare number (`"paquete de 6"`);
/// 5. a bare item word with no number (`"unidad"` → 1 item).
///
/// Returns `None` for unrecognized or malformed strings, and for
/// magnitudes that are zero, negative, or non-finite.
#[must_use]
pub fn parse_quantity(unit_text: &str, overrides: Option<&[OverrideRule]>) -> Option<Quantity> {
    let text = units::normalize_unit_text(unit_text);
    if text.is_empty() {
        return None;
    }

    if let Some(rules) = overrides {
        if let Some(rule) = rules.iter().find(|r| r.matches(&text)) {
            return valid(rule.quantity());
        }
    }

    if let Some(items) = units::pack_count(&text) {
        return valid(Quantity::count(items));
    }

    let scanned = units::scan_numbers(&text, |value, end| {
        if let Some(rule) = units::unit_rule_after(&text, end) {
            return valid(Quantity {
                measurement: rule.measurement,
                base_amount: value * rule.to_base,
            });
        }
        if units::item_word_after(&text, end) {
            return valid(Quantity::count(value));
        }
        None
    });
    if scanned.is_some() {
        return scanned;
    }

    if units::contains_pack_word(&text) {
        let bare = units::scan_numbers(&text, |value, _| valid(Quantity::count(value)));
        if bare.is_some() {
            return bare;
        }
    }

    if units::contains_item_word(&text) {
        return Some(Quantity::count(1.0));
    }

    None
}

fn valid(quantity: Quantity) -> Option<Quantity> {
    (quantity.base_amount.is_finite() && quantity.base_amount > 0.0).then_some(quantity)
}
