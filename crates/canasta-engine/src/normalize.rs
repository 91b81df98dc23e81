//! Per-product price normalization.

use canasta_core::Quantity;

/// Price per base unit: `min_price / base_amount`.
///
/// Returns `None` when the price is non-positive or non-finite, or when
/// the division produces a non-positive or non-finite result — the
/// candidate is then excluded from the best-value reduction.
#[must_use]
pub fn unit_price(min_price: f64, quantity: &Quantity) -> Option<f64> {
    if !(min_price.is_finite() && min_price > 0.0) {
        return None;
    }
    let price = min_price / quantity.base_amount;
    (price.is_finite() && price > 0.0).then_some(price)
}
