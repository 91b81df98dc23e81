//! Per-group unit-parser overrides.
//!
//! Some product families use ambiguous or non-standard unit notations the
//! generic parser cannot resolve (e.g. a group where `"unidad"` is really a
//! fixed 400 g portion). Overrides are declarative data keyed by group slug,
//! loaded from a YAML file, and consulted before the generic rule list.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::quantity::{Measurement, Quantity};
use crate::ConfigError;

/// A single override: when `pattern` appears in a product's lowercased unit
/// string, the product's quantity is the declared fixed amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideRule {
    /// Case-insensitive substring to match against the raw unit text.
    pub pattern: String,
    pub kind: Measurement,
    /// Amount in the family's base unit: grams, milliliters, or items.
    pub base_amount: f64,
}

impl OverrideRule {
    /// Returns `true` if this rule applies to the given pre-lowercased unit text.
    #[must_use]
    pub fn matches(&self, lower_unit: &str) -> bool {
        lower_unit.contains(&self.pattern.to_lowercase())
    }

    #[must_use]
    pub fn quantity(&self) -> Quantity {
        Quantity {
            measurement: self.kind,
            base_amount: self.base_amount,
        }
    }
}

/// Override rules grouped by the owning group's slug.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverrideTable {
    #[serde(default)]
    pub groups: HashMap<String, Vec<OverrideRule>>,
}

impl OverrideTable {
    /// An empty table; every group falls through to the generic parser.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The override rules for a group slug, if any are configured.
    #[must_use]
    pub fn rules_for(&self, slug: &str) -> Option<&[OverrideRule]> {
        self.groups.get(slug).map(Vec::as_slice)
    }
}

/// Load and validate the parser override table from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation (empty pattern, or non-positive/non-finite amount).
pub fn load_overrides(path: &Path) -> Result<OverrideTable, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::OverridesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let table: OverrideTable = serde_yaml::from_str(&content)?;
    validate_overrides(&table)?;

    Ok(table)
}

fn validate_overrides(table: &OverrideTable) -> Result<(), ConfigError> {
    for (slug, rules) in &table.groups {
        if rules.is_empty() {
            return Err(ConfigError::Validation(format!(
                "group '{slug}' has an empty override rule list"
            )));
        }
        for rule in rules {
            if rule.pattern.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "group '{slug}' has an override rule with an empty pattern"
                )));
            }
            if !(rule.base_amount.is_finite() && rule.base_amount > 0.0) {
                return Err(ConfigError::Validation(format!(
                    "group '{slug}' override '{}' has invalid base_amount {}",
                    rule.pattern, rule.base_amount
                )));
            }
        }
    }
    Ok(())
}
