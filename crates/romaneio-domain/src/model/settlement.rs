//! Ticket measurements and settled weights

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Raw scale-house readings of one truckload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketMeasurements {
    pub gross_weight_kg: Decimal,
    pub tare_weight_kg: Decimal,
    pub moisture_pct: Decimal,
    pub impurity_pct: Decimal,
    #[serde(default)]
    pub damage_pct: Decimal,
}

/// Deductions typed in by the operator instead of computed
///
/// A value of zero counts as "not provided": it never forces a zero
/// deduction over a computed one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualOverrides {
    #[serde(default)]
    pub moisture_kg: Option<Decimal>,
    #[serde(default)]
    pub impurity_kg: Option<Decimal>,
    #[serde(default)]
    pub damage_kg: Option<Decimal>,
}

impl ManualOverrides {
    /// Drop zero-valued overrides so that only effective ones remain
    pub fn normalized(self) -> Self {
        Self {
            moisture_kg: effective(self.moisture_kg),
            impurity_kg: effective(self.impurity_kg),
            damage_kg: effective(self.damage_kg),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.normalized() == Self::default()
    }
}

fn effective(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| !v.is_zero())
}

/// Weights derived from a ticket, recomputed on every write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub load_weight_kg: Decimal,
    pub moisture_deduction_kg: Decimal,
    pub impurity_deduction_kg: Decimal,
    pub damage_deduction_kg: Decimal,
    pub total_deductions_kg: Decimal,
    pub shrinkage_kg: Decimal,
    pub net_weight_kg: Decimal,
}

impl Settlement {
    /// Weight left after classification deductions, before shrinkage
    pub fn post_classification_kg(&self) -> Decimal {
        self.load_weight_kg - self.total_deductions_kg
    }

    /// Presentation copy rounded half away from zero
    pub fn rounded(&self, dp: u32) -> Self {
        let r = |v: Decimal| round_half_away(v, dp);
        Self {
            load_weight_kg: r(self.load_weight_kg),
            moisture_deduction_kg: r(self.moisture_deduction_kg),
            impurity_deduction_kg: r(self.impurity_deduction_kg),
            damage_deduction_kg: r(self.damage_deduction_kg),
            total_deductions_kg: r(self.total_deductions_kg),
            shrinkage_kg: r(self.shrinkage_kg),
            net_weight_kg: r(self.net_weight_kg),
        }
    }
}

/// Round for presentation: half away from zero, at most `dp` places
pub fn round_half_away(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Two-decimal display form used by every report and table
pub fn format_2dp(value: Decimal) -> String {
    round_half_away(value, 2).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_zero_override_is_not_effective() {
        let overrides = ManualOverrides {
            moisture_kg: Some(Decimal::ZERO),
            impurity_kg: Some(d("12.5")),
            damage_kg: None,
        };
        let normalized = overrides.normalized();
        assert_eq!(normalized.moisture_kg, None);
        assert_eq!(normalized.impurity_kg, Some(d("12.5")));
        assert!(!overrides.is_empty());
        assert!(ManualOverrides {
            moisture_kg: Some(Decimal::ZERO),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn test_rounded_half_away_from_zero() {
        let settlement = Settlement {
            load_weight_kg: d("100"),
            shrinkage_kg: d("1.005"),
            net_weight_kg: d("-2.345"),
            ..Default::default()
        };
        let rounded = settlement.rounded(2);
        assert_eq!(rounded.shrinkage_kg, d("1.01"));
        assert_eq!(rounded.net_weight_kg, d("-2.35"));
        assert_eq!(rounded.load_weight_kg, d("100"));
    }

    #[test]
    fn test_format_2dp() {
        assert_eq!(format_2dp(d("125.445")), "125.45");
        assert_eq!(format_2dp(d("-0.005")), "-0.01");
        assert_eq!(format_2dp(d("8000")), "8000");
    }
}
