use serde::{Deserialize, Serialize};

/// Physical family of a parsed unit string.
///
/// Every family has a canonical base unit all amounts are normalized into
/// before comparison: grams for `Mass`, milliliters for `Volume`, discrete
/// items for `Count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Measurement {
    Mass,
    Volume,
    Count,
}

impl std::fmt::Display for Measurement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Measurement::Mass => write!(f, "mass"),
            Measurement::Volume => write!(f, "volume"),
            Measurement::Count => write!(f, "count"),
        }
    }
}

/// A typed quantity parsed from a product's free-text unit string,
/// e.g. `"500 g"` → mass of 500 grams, `"paquete x12"` → count of 12.
///
/// Never persisted; recomputed fresh on every aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub measurement: Measurement,
    /// Amount in the family's base unit (grams, milliliters, or items).
    pub base_amount: f64,
}

impl Quantity {
    #[must_use]
    pub fn mass_grams(grams: f64) -> Self {
        Self {
            measurement: Measurement::Mass,
            base_amount: grams,
        }
    }

    #[must_use]
    pub fn volume_ml(milliliters: f64) -> Self {
        Self {
            measurement: Measurement::Volume,
            base_amount: milliliters,
        }
    }

    #[must_use]
    pub fn count(items: f64) -> Self {
        Self {
            measurement: Measurement::Count,
            base_amount: items,
        }
    }

    /// The comparison axis this quantity participates in. Mass and volume
    /// collapse into a single `Measure` axis; discrete items are `Count`.
    #[must_use]
    pub fn comparable_type(&self) -> ComparableType {
        match self.measurement {
            Measurement::Mass | Measurement::Volume => ComparableType::Measure,
            Measurement::Count => ComparableType::Count,
        }
    }
}

/// The two comparison axes a group can be judged on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparableType {
    /// Normalized mass or volume (price per gram / per milliliter).
    Measure,
    /// Discrete item count (price per unit in a multipack).
    Count,
}

impl std::fmt::Display for ComparableType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComparableType::Measure => write!(f, "measure"),
            ComparableType::Count => write!(f, "count"),
        }
    }
}

/// A group's manual comparison preference, parsed once from the raw stored
/// string so downstream logic never re-inspects sentinels.
///
/// Only the `"count"` sentinel (case-insensitive, trimmed) is recognized;
/// anything else — including absent — means no preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComparePreference {
    #[default]
    None,
    Count,
}

impl ComparePreference {
    #[must_use]
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.trim().eq_ignore_ascii_case("count") => ComparePreference::Count,
            _ => ComparePreference::None,
        }
    }

    #[must_use]
    pub fn wants_count(self) -> bool {
        self == ComparePreference::Count
    }
}
