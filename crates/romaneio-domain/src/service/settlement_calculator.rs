//! Weighing settlement calculation
//!
//! Derives every weight of a ticket from its raw readings, in this order:
//! load, the three classification deductions (manual overrides win),
//! their total, technical shrinkage on what remains, and finally net weight.
//! Nothing is clamped: a tare above gross or oversized deductions yield
//! negative weights, and rejecting them is the caller's business.

use std::str::FromStr;

use rust_decimal::Decimal;

use romaneio_types::SettlementError;

use crate::model::{ManualOverrides, Settlement, StandardThresholds, TicketMeasurements, DEFAULT_STANDARD};

/// Settle a ticket.
///
/// `standard` falls back to [`DEFAULT_STANDARD`] when absent; `shrinkage_pct`
/// comes from the ticket's warehouse rate, absent meaning no shrinkage.
pub fn settle(
    measurements: &TicketMeasurements,
    overrides: &ManualOverrides,
    standard: Option<&StandardThresholds>,
    shrinkage_pct: Option<Decimal>,
) -> Settlement {
    let standard = standard.unwrap_or(&DEFAULT_STANDARD);
    let overrides = overrides.normalized();

    let load = measurements.gross_weight_kg - measurements.tare_weight_kg;

    let computed_moisture = if measurements.moisture_pct > standard.moisture_pct {
        let excess = measurements.moisture_pct - standard.moisture_pct;
        percent_of(load, excess) + percent_of(load, standard.drying_fee_pct)
    } else {
        Decimal::ZERO
    };
    let computed_impurity = excess_deduction(load, measurements.impurity_pct, standard.impurity_pct);
    let computed_damage = excess_deduction(load, measurements.damage_pct, standard.damage_pct);

    let moisture = overrides.moisture_kg.unwrap_or(computed_moisture);
    let impurity = overrides.impurity_kg.unwrap_or(computed_impurity);
    let damage = overrides.damage_kg.unwrap_or(computed_damage);

    let total = moisture + impurity + damage;
    let post_classification = load - total;

    let shrinkage = match shrinkage_pct {
        Some(pct) => percent_of(post_classification, pct),
        None => Decimal::ZERO,
    };

    Settlement {
        load_weight_kg: load,
        moisture_deduction_kg: moisture,
        impurity_deduction_kg: impurity,
        damage_deduction_kg: damage,
        total_deductions_kg: total,
        shrinkage_kg: shrinkage,
        net_weight_kg: post_classification - shrinkage,
    }
}

fn percent_of(base: Decimal, pct: Decimal) -> Decimal {
    base * (pct / Decimal::ONE_HUNDRED)
}

fn excess_deduction(load: Decimal, measured_pct: Decimal, threshold_pct: Decimal) -> Decimal {
    if measured_pct > threshold_pct {
        percent_of(load, measured_pct - threshold_pct)
    } else {
        Decimal::ZERO
    }
}

/// Ticket readings as typed by an operator or read from a file
#[derive(Debug, Clone, Default)]
pub struct RawMeasurements<'a> {
    pub gross_weight_kg: Option<&'a str>,
    pub tare_weight_kg: Option<&'a str>,
    pub moisture_pct: Option<&'a str>,
    pub impurity_pct: Option<&'a str>,
    /// Defaults to zero when blank
    pub damage_pct: Option<&'a str>,
}

impl RawMeasurements<'_> {
    pub fn parse(&self) -> Result<TicketMeasurements, SettlementError> {
        self.parse_with(NumberStyle::Auto)
    }

    pub fn parse_with(&self, style: NumberStyle) -> Result<TicketMeasurements, SettlementError> {
        let required = |field: &'static str, value: Option<&str>| {
            style
                .parse_optional(field, value)?
                .ok_or(SettlementError::MissingField(field))
        };

        Ok(TicketMeasurements {
            gross_weight_kg: required("gross_weight_kg", self.gross_weight_kg)?,
            tare_weight_kg: required("tare_weight_kg", self.tare_weight_kg)?,
            moisture_pct: required("moisture_pct", self.moisture_pct)?,
            impurity_pct: required("impurity_pct", self.impurity_pct)?,
            damage_pct: style
                .parse_optional("damage_pct", self.damage_pct)?
                .unwrap_or(Decimal::ZERO),
        })
    }
}

/// Largest magnitude accepted for any reading, threshold, or override.
///
/// Keeps every intermediate of [`settle`] inside `Decimal`'s range.
pub const MAX_MAGNITUDE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Reject values whose magnitude exceeds [`MAX_MAGNITUDE`]
pub fn check_magnitude(field: &'static str, value: Decimal) -> Result<Decimal, SettlementError> {
    if value.abs() > MAX_MAGNITUDE {
        return Err(SettlementError::InvalidInput {
            field,
            value: value.to_string(),
        });
    }
    Ok(value)
}

/// How separators in a number are read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NumberStyle {
    /// `1234.56` or `1.234,56`; a lone comma or a lone dot is the decimal point
    #[default]
    Auto,
    /// `1.234,56`: the dot only groups thousands, so `12.340` is 12340
    Brazilian,
}

impl NumberStyle {
    /// Parse an optional decimal; blank means absent
    pub fn parse_optional(self, field: &'static str, value: Option<&str>) -> Result<Option<Decimal>, SettlementError> {
        match value.map(str::trim) {
            None | Some("") => Ok(None),
            Some(v) => self.parse(field, v).map(Some),
        }
    }

    pub fn parse(self, field: &'static str, value: &str) -> Result<Decimal, SettlementError> {
        let trimmed = value.trim();
        let normalized = match (self, trimmed.rfind(','), trimmed.rfind('.')) {
            (NumberStyle::Brazilian, _, _) => trimmed.replace('.', "").replace(',', "."),
            (NumberStyle::Auto, Some(comma), Some(dot)) if comma > dot => {
                trimmed.replace('.', "").replace(',', ".")
            }
            (NumberStyle::Auto, Some(_), Some(_)) => trimmed.replace(',', ""),
            (NumberStyle::Auto, Some(_), None) => trimmed.replace(',', "."),
            _ => trimmed.to_string(),
        };
        let invalid = || SettlementError::InvalidInput {
            field,
            value: value.to_string(),
        };

        let parsed = Decimal::from_str(&normalized).map_err(|_| invalid())?;
        check_magnitude(field, parsed).map_err(|_| invalid())
    }
}

/// Parse an optional decimal; blank means absent
pub fn parse_optional(field: &'static str, value: Option<&str>) -> Result<Option<Decimal>, SettlementError> {
    NumberStyle::Auto.parse_optional(field, value)
}

/// Parse a decimal written either as `1234.56` or Brazilian-style `1.234,56`.
///
/// When both separators appear the last one is the decimal point; a lone
/// comma is always the decimal point. Values beyond [`MAX_MAGNITUDE`] are
/// rejected.
pub fn parse_decimal(field: &'static str, value: &str) -> Result<Decimal, SettlementError> {
    NumberStyle::Auto.parse(field, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn measurements(gross: &str, tare: &str, moisture: &str, impurity: &str, damage: &str) -> TicketMeasurements {
        TicketMeasurements {
            gross_weight_kg: d(gross),
            tare_weight_kg: d(tare),
            moisture_pct: d(moisture),
            impurity_pct: d(impurity),
            damage_pct: d(damage),
        }
    }

    fn scenario_one() -> TicketMeasurements {
        measurements("10000", "2000", "18", "0.5", "0")
    }

    fn standard(moisture: &str, impurity: &str, damage: &str, fee: &str) -> StandardThresholds {
        StandardThresholds {
            moisture_pct: d(moisture),
            impurity_pct: d(impurity),
            damage_pct: d(damage),
            drying_fee_pct: d(fee),
        }
    }

    fn assert_net_identity(s: &Settlement) {
        assert_eq!(s.net_weight_kg, s.load_weight_kg - s.total_deductions_kg - s.shrinkage_kg);
        assert_eq!(
            s.total_deductions_kg,
            s.moisture_deduction_kg + s.impurity_deduction_kg + s.damage_deduction_kg
        );
    }

    #[test]
    fn test_scenario_default_standard() {
        let s = settle(&scenario_one(), &ManualOverrides::default(), None, None);
        assert_eq!(
            s,
            Settlement {
                load_weight_kg: d("8000"),
                moisture_deduction_kg: d("320"),
                impurity_deduction_kg: Decimal::ZERO,
                damage_deduction_kg: Decimal::ZERO,
                total_deductions_kg: d("320"),
                shrinkage_kg: Decimal::ZERO,
                net_weight_kg: d("7680"),
            }
        );
    }

    #[test]
    fn test_scenario_table_with_drying_fee() {
        let table = standard("12", "1", "0", "2");
        let s = settle(&scenario_one(), &ManualOverrides::default(), Some(&table), None);
        assert_eq!(s.moisture_deduction_kg, d("640"));
        assert_eq!(s.net_weight_kg, d("7360"));
        assert_net_identity(&s);
    }

    #[test]
    fn test_scenario_warehouse_shrinkage() {
        let s = settle(&scenario_one(), &ManualOverrides::default(), None, Some(d("2")));
        assert_eq!(s.post_classification_kg(), d("7680"));
        assert_eq!(s.shrinkage_kg, d("153.6"));
        assert_eq!(s.net_weight_kg, d("7526.4"));
        assert_net_identity(&s);
    }

    #[test]
    fn test_scenario_manual_moisture_override() {
        let overrides = ManualOverrides {
            moisture_kg: Some(d("100")),
            ..Default::default()
        };
        let s = settle(&scenario_one(), &overrides, None, None);
        assert_eq!(s.moisture_deduction_kg, d("100"));
        assert_eq!(s.impurity_deduction_kg, Decimal::ZERO);
        assert_eq!(s.damage_deduction_kg, Decimal::ZERO);
        assert_eq!(s.net_weight_kg, d("7900"));
    }

    #[test]
    fn test_missing_standard_equals_default_standard() {
        let m = measurements("31250", "12480", "15.7", "2.3", "4.1");
        let implicit = settle(&m, &ManualOverrides::default(), None, None);
        let explicit = settle(&m, &ManualOverrides::default(), Some(&DEFAULT_STANDARD), None);
        assert_eq!(implicit, explicit);
    }

    #[test]
    fn test_no_deduction_at_or_below_threshold() {
        let table = standard("14", "1", "2", "3");
        let m = measurements("10000", "2000", "14", "1", "2");
        let s = settle(&m, &ManualOverrides::default(), Some(&table), None);
        assert_eq!(s.moisture_deduction_kg, Decimal::ZERO);
        assert_eq!(s.impurity_deduction_kg, Decimal::ZERO);
        assert_eq!(s.damage_deduction_kg, Decimal::ZERO);
        assert_eq!(s.net_weight_kg, d("8000"));
    }

    #[test]
    fn test_drying_fee_only_charged_with_excess_moisture() {
        let table = standard("14", "1", "0", "5");
        let dry = measurements("10000", "2000", "13.5", "0", "0");
        assert_eq!(
            settle(&dry, &ManualOverrides::default(), Some(&table), None).moisture_deduction_kg,
            Decimal::ZERO
        );
    }

    #[test]
    fn test_moisture_rate_folds_excess_and_fee() {
        let cases = [
            ("14.01", "0"),
            ("16.35", "1.5"),
            ("22", "0.25"),
            ("30.5", "3"),
        ];
        let m_load = d("27340") - d("9870");
        for (moisture, fee) in cases {
            let table = standard("14", "1", "0", fee);
            let m = measurements("27340", "9870", moisture, "0", "0");
            let s = settle(&m, &ManualOverrides::default(), Some(&table), None);
            let expected = m_load * ((d(moisture) - d("14")) + d(fee)) / Decimal::ONE_HUNDRED;
            assert_eq!(s.moisture_deduction_kg, expected, "moisture {moisture} fee {fee}");
        }
    }

    #[test]
    fn test_impurity_and_damage_deductions() {
        let table = standard("14", "1", "0.5", "0");
        let m = measurements("20000", "5000", "10", "3", "2.5");
        let s = settle(&m, &ManualOverrides::default(), Some(&table), None);
        assert_eq!(s.impurity_deduction_kg, d("300"));
        assert_eq!(s.damage_deduction_kg, d("300"));
        assert_eq!(s.total_deductions_kg, d("600"));
        assert_eq!(s.net_weight_kg, d("14400"));
    }

    #[test]
    fn test_override_replaces_only_its_category() {
        let table = standard("14", "1", "0", "0");
        let m = measurements("20000", "5000", "16", "3", "2");
        let base = settle(&m, &ManualOverrides::default(), Some(&table), None);

        let only_impurity = ManualOverrides {
            impurity_kg: Some(d("42")),
            ..Default::default()
        };
        let s = settle(&m, &only_impurity, Some(&table), None);
        assert_eq!(s.impurity_deduction_kg, d("42"));
        assert_eq!(s.moisture_deduction_kg, base.moisture_deduction_kg);
        assert_eq!(s.damage_deduction_kg, base.damage_deduction_kg);

        let only_damage = ManualOverrides {
            damage_kg: Some(d("7.5")),
            ..Default::default()
        };
        let s = settle(&m, &only_damage, Some(&table), None);
        assert_eq!(s.damage_deduction_kg, d("7.5"));
        assert_eq!(s.moisture_deduction_kg, base.moisture_deduction_kg);
        assert_eq!(s.impurity_deduction_kg, base.impurity_deduction_kg);
    }

    #[test]
    fn test_zero_override_means_computed() {
        let overrides = ManualOverrides {
            moisture_kg: Some(Decimal::ZERO),
            impurity_kg: Some(Decimal::ZERO),
            damage_kg: Some(Decimal::ZERO),
        };
        let s = settle(&scenario_one(), &overrides, None, None);
        assert_eq!(s.moisture_deduction_kg, d("320"));
    }

    #[test]
    fn test_net_identity_across_combinations() {
        let table = standard("13", "1", "1", "1.5");
        let m = measurements("41230", "15110", "17.2", "2.4", "3.3");
        let override_sets = [
            ManualOverrides::default(),
            ManualOverrides { moisture_kg: Some(d("500")), ..Default::default() },
            ManualOverrides { impurity_kg: Some(d("12.34")), damage_kg: Some(d("99")), ..Default::default() },
            ManualOverrides { moisture_kg: Some(d("1")), impurity_kg: Some(d("2")), damage_kg: Some(d("3")) },
        ];
        for overrides in &override_sets {
            for thresholds in [None, Some(&table)] {
                for shrinkage in [None, Some(d("0")), Some(d("0.25")), Some(d("2"))] {
                    let s = settle(&m, overrides, thresholds, shrinkage);
                    assert_net_identity(&s);
                    assert_eq!(s.load_weight_kg, d("26120"));
                }
            }
        }
    }

    #[test]
    fn test_idempotent() {
        let table = standard("12.5", "0.75", "0", "1.25");
        let m = measurements("38765", "14321", "19.87", "1.93", "0.61");
        let overrides = ManualOverrides { damage_kg: Some(d("33.3")), ..Default::default() };
        let first = settle(&m, &overrides, Some(&table), Some(d("0.3")));
        let second = settle(&m, &overrides, Some(&table), Some(d("0.3")));
        assert_eq!(first, second);
        assert_eq!(first.net_weight_kg.to_string(), second.net_weight_kg.to_string());
    }

    #[test]
    fn test_negative_load_passes_through() {
        let m = measurements("2000", "10000", "18", "0.5", "0");
        let s = settle(&m, &ManualOverrides::default(), None, None);
        assert_eq!(s.load_weight_kg, d("-8000"));
        assert_eq!(s.moisture_deduction_kg, d("-320"));
        assert_eq!(s.net_weight_kg, d("-7680"));
    }

    #[test]
    fn test_net_weight_may_go_negative() {
        let overrides = ManualOverrides { impurity_kg: Some(d("9000")), ..Default::default() };
        let s = settle(&scenario_one(), &overrides, None, Some(d("10")));
        assert_eq!(s.post_classification_kg(), d("-1320"));
        assert_eq!(s.shrinkage_kg, d("-132"));
        assert_eq!(s.net_weight_kg, d("-1188"));
    }

    #[test]
    fn test_net_never_exceeds_load_with_sane_inputs() {
        let s = settle(&scenario_one(), &ManualOverrides::default(), None, Some(d("0.5")));
        assert!(s.net_weight_kg <= s.load_weight_kg);
    }

    #[test]
    fn test_parse_raw_measurements() {
        let raw = RawMeasurements {
            gross_weight_kg: Some("10000"),
            tare_weight_kg: Some("2000"),
            moisture_pct: Some("18,5"),
            impurity_pct: Some(" 0.5 "),
            damage_pct: None,
        };
        let m = raw.parse().unwrap();
        assert_eq!(m.gross_weight_kg, d("10000"));
        assert_eq!(m.moisture_pct, d("18.5"));
        assert_eq!(m.impurity_pct, d("0.5"));
        assert_eq!(m.damage_pct, Decimal::ZERO);
    }

    #[test]
    fn test_parse_missing_field() {
        let raw = RawMeasurements {
            gross_weight_kg: Some("10000"),
            tare_weight_kg: Some(""),
            moisture_pct: Some("14"),
            impurity_pct: Some("1"),
            damage_pct: None,
        };
        assert_eq!(raw.parse(), Err(SettlementError::MissingField("tare_weight_kg")));
    }

    #[test]
    fn test_parse_invalid_field() {
        let raw = RawMeasurements {
            gross_weight_kg: Some("10000"),
            tare_weight_kg: Some("2000"),
            moisture_pct: Some("dezoito"),
            impurity_pct: Some("1"),
            damage_pct: None,
        };
        assert_eq!(
            raw.parse(),
            Err(SettlementError::InvalidInput {
                field: "moisture_pct",
                value: "dezoito".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_decimal_separators() {
        assert_eq!(parse_decimal("x", "1.234,56").unwrap(), d("1234.56"));
        assert_eq!(parse_decimal("x", "1,234.56").unwrap(), d("1234.56"));
        assert_eq!(parse_decimal("x", "0,5").unwrap(), d("0.5"));
        assert_eq!(parse_decimal("x", "-12").unwrap(), d("-12"));
        assert!(parse_decimal("x", "1,2,3").is_err());
    }

    #[test]
    fn test_brazilian_style_dot_groups_thousands() {
        let br = NumberStyle::Brazilian;
        assert_eq!(br.parse("x", "12.340").unwrap(), d("12340"));
        assert_eq!(br.parse("x", "1.234,56").unwrap(), d("1234.56"));
        assert_eq!(br.parse("x", "0,5").unwrap(), d("0.5"));
        assert_eq!(br.parse("x", "18").unwrap(), d("18"));
        assert_eq!(parse_decimal("x", "12.340").unwrap(), d("12.34"));
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let raw = RawMeasurements {
            gross_weight_kg: Some("50000000000000000000000000000"),
            tare_weight_kg: Some("-50000000000000000000000000000"),
            moisture_pct: Some("14"),
            impurity_pct: Some("1"),
            damage_pct: None,
        };
        assert_eq!(
            raw.parse(),
            Err(SettlementError::InvalidInput {
                field: "gross_weight_kg",
                value: "50000000000000000000000000000".to_string(),
            })
        );
        assert!(parse_decimal("gross_weight_kg", "100000000000000000000").is_err());
        assert!(parse_decimal("moisture_pct", "100000000000").is_err());
        assert!(parse_optional("moisture_kg", Some("-1000000001")).is_err());
        assert_eq!(parse_decimal("gross_weight_kg", "1000000000").unwrap(), MAX_MAGNITUDE);
    }

    #[test]
    fn test_settle_at_the_bounds_does_not_overflow() {
        let max = MAX_MAGNITUDE;
        let m = TicketMeasurements {
            gross_weight_kg: max,
            tare_weight_kg: -max,
            moisture_pct: max,
            impurity_pct: max,
            damage_pct: max,
        };
        let worst = StandardThresholds {
            moisture_pct: -max,
            impurity_pct: -max,
            damage_pct: -max,
            drying_fee_pct: max,
        };
        let overrides = ManualOverrides::default();
        let s = settle(&m, &overrides, Some(&worst), Some(max));
        assert_net_identity(&s);
        assert_eq!(s.load_weight_kg, d("2000000000"));
    }
}
