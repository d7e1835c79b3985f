//! Third-party warehouse rate (taxa de armazém) definitions

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::new_id;

/// How often storage fees are billed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeFrequency {
    Weekly,
    #[default]
    Fortnightly,
    Monthly,
}

impl std::fmt::Display for FeeFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeeFrequency::Weekly => write!(f, "weekly"),
            FeeFrequency::Fortnightly => write!(f, "fortnightly"),
            FeeFrequency::Monthly => write!(f, "monthly"),
        }
    }
}

impl std::str::FromStr for FeeFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "semanal" => Ok(FeeFrequency::Weekly),
            "fortnightly" | "quinzenal" => Ok(FeeFrequency::Fortnightly),
            "monthly" | "mensal" => Ok(FeeFrequency::Monthly),
            other => Err(format!("unknown fee frequency: {}", other)),
        }
    }
}

/// Currency in which the warehouse is paid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentUnit {
    #[default]
    Brl,
    Bag,
}

impl std::fmt::Display for PaymentUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentUnit::Brl => write!(f, "BRL"),
            PaymentUnit::Bag => write!(f, "bag"),
        }
    }
}

impl std::str::FromStr for PaymentUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "brl" | "reais" => Ok(PaymentUnit::Brl),
            "bag" | "sacas" => Ok(PaymentUnit::Bag),
            other => Err(format!("unknown payment unit: {}", other)),
        }
    }
}

/// Fees charged by a third-party warehouse receiving the grain
///
/// Only `technical_shrinkage_pct` takes part in ticket settlement; the
/// billing fields are carried for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseRate {
    #[serde(default = "new_id")]
    pub id: String,
    #[serde(default)]
    pub tenant: String,
    /// Warehouse / supplier name, unique per tenant
    pub supplier: String,
    /// Reception fee per ton
    #[serde(default)]
    pub reception_fee_per_ton: Decimal,
    #[serde(default)]
    pub storage_fee: Decimal,
    #[serde(default)]
    pub frequency: FeeFrequency,
    #[serde(default)]
    pub payment_unit: PaymentUnit,
    /// Quebra técnica, percent of post-classification weight
    #[serde(default)]
    pub technical_shrinkage_pct: Decimal,
}

impl WarehouseRate {
    pub fn new(tenant: impl Into<String>, supplier: impl Into<String>, shrinkage_pct: Decimal) -> Self {
        Self {
            id: new_id(),
            tenant: tenant.into(),
            supplier: supplier.into(),
            reception_fee_per_ton: Decimal::ZERO,
            storage_fee: Decimal::ZERO,
            frequency: FeeFrequency::default(),
            payment_unit: PaymentUnit::default(),
            technical_shrinkage_pct: shrinkage_pct,
        }
    }
}

impl std::fmt::Display for WarehouseRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (reception: {}, storage: {} {}/{})",
            self.supplier, self.reception_fee_per_ton, self.storage_fee, self.payment_unit, self.frequency
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fee_terms() {
        assert_eq!("Mensal".parse::<FeeFrequency>().unwrap(), FeeFrequency::Monthly);
        assert_eq!("weekly".parse::<FeeFrequency>().unwrap(), FeeFrequency::Weekly);
        assert_eq!("sacas".parse::<PaymentUnit>().unwrap(), PaymentUnit::Bag);
        assert!("daily".parse::<FeeFrequency>().is_err());
    }

    #[test]
    fn test_new_rate_defaults() {
        let rate = WarehouseRate::new("acme", "Armazém Central", Decimal::new(25, 2));
        assert_eq!(rate.frequency, FeeFrequency::Fortnightly);
        assert_eq!(rate.payment_unit, PaymentUnit::Brl);
        assert!(rate.reception_fee_per_ton.is_zero());
        assert_eq!(rate.to_string(), "Armazém Central (reception: 0, storage: 0 BRL/fortnightly)");
    }
}
