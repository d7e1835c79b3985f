//! Classification standard (tabela de classificação) definitions

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::new_id;

/// Quality thresholds a ticket is classified against, all in percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardThresholds {
    pub moisture_pct: Decimal,
    pub impurity_pct: Decimal,
    pub damage_pct: Decimal,
    /// Extra drying fee, charged only on top of excess moisture
    pub drying_fee_pct: Decimal,
}

/// Thresholds substituted when no classification table matches a ticket's crop:
/// 14% moisture, 1% impurity, 0% damage, no drying fee.
pub const DEFAULT_STANDARD: StandardThresholds = StandardThresholds {
    moisture_pct: Decimal::from_parts(1400, 0, 0, false, 2),
    impurity_pct: Decimal::from_parts(100, 0, 0, false, 2),
    damage_pct: Decimal::from_parts(0, 0, 0, false, 2),
    drying_fee_pct: Decimal::from_parts(0, 0, 0, false, 2),
};

impl Default for StandardThresholds {
    fn default() -> Self {
        DEFAULT_STANDARD
    }
}

/// Per-crop reference thresholds maintained by back-office users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationStandard {
    #[serde(default = "new_id")]
    pub id: String,
    #[serde(default)]
    pub tenant: String,
    /// Table name (e.g. "Soja padrão Cargill")
    pub name: String,
    /// Crop the table applies to, matched case-insensitively
    pub crop: String,
    #[serde(default = "default_moisture")]
    pub standard_moisture_pct: Decimal,
    #[serde(default = "default_impurity")]
    pub standard_impurity_pct: Decimal,
    #[serde(default = "default_damage")]
    pub standard_damage_pct: Decimal,
    #[serde(default = "default_drying_fee")]
    pub drying_fee_pct: Decimal,
}

fn default_moisture() -> Decimal {
    DEFAULT_STANDARD.moisture_pct
}

fn default_impurity() -> Decimal {
    DEFAULT_STANDARD.impurity_pct
}

fn default_damage() -> Decimal {
    DEFAULT_STANDARD.damage_pct
}

fn default_drying_fee() -> Decimal {
    DEFAULT_STANDARD.drying_fee_pct
}

impl ClassificationStandard {
    /// Create a table for a crop starting from the default thresholds
    pub fn new(tenant: impl Into<String>, name: impl Into<String>, crop: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            tenant: tenant.into(),
            name: name.into(),
            crop: crop.into(),
            standard_moisture_pct: default_moisture(),
            standard_impurity_pct: default_impurity(),
            standard_damage_pct: default_damage(),
            drying_fee_pct: default_drying_fee(),
        }
    }

    pub fn thresholds(&self) -> StandardThresholds {
        StandardThresholds {
            moisture_pct: self.standard_moisture_pct,
            impurity_pct: self.standard_impurity_pct,
            damage_pct: self.standard_damage_pct,
            drying_fee_pct: self.drying_fee_pct,
        }
    }

    /// Whether this table applies to the given tenant and crop name, ignoring
    /// case and surrounding whitespace on both names
    pub fn applies_to(&self, tenant: &str, crop: &str) -> bool {
        self.tenant == tenant && self.crop.trim().to_lowercase() == crop.trim().to_lowercase()
    }
}

impl std::fmt::Display for ClassificationStandard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.name, self.crop)
    }
}
