//! Unit normalization and best-value selection.
//!
//! Pure, synchronous computation: raw unit strings and reduced minimum
//! prices go in, per-group winners and orderings come out. All I/O lives
//! in `canasta-db` and the CLI; everything here is deterministic and
//! testable without a database.

pub mod aggregate;
pub mod classify;
pub mod normalize;
pub mod parse;
pub mod rank;
mod units;

pub use aggregate::{aggregate, Candidate, GroupStat, Winner, PRICE_EPSILON};
pub use classify::{classify, select_target_axis};
pub use normalize::unit_price;
pub use parse::parse_quantity;
pub use rank::rank_by_best_value;
