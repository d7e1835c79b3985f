//! Reference data loader from TOML
//!
//! Bulk-loads classification tables and warehouse rates, e.g.
//!
//! ```toml
//! [[standards]]
//! name = "Soja padrão"
//! crop = "Soja"
//! standard_moisture_pct = 14.0
//!
//! [[warehouses]]
//! supplier = "Armazém Central"
//! technical_shrinkage_pct = 0.25
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use romaneio_domain::model::{ClassificationStandard, WarehouseRate};
use romaneio_domain::service::check_magnitude;
use romaneio_types::{Error, Result};

/// Container for parsing a reference data file
#[derive(Debug, Default, Deserialize)]
pub struct ReferenceData {
    #[serde(default)]
    pub standards: Vec<ClassificationStandard>,
    #[serde(default)]
    pub warehouses: Vec<WarehouseRate>,
}

impl ReferenceData {
    pub fn load_from_file(path: &Path, tenant: &str) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::ReferenceData(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::load_from_str(&content, tenant)
    }

    /// Parse TOML; records without a tenant are assigned `tenant`
    pub fn load_from_str(toml_content: &str, tenant: &str) -> Result<Self> {
        let mut data: ReferenceData = toml::from_str(toml_content)
            .map_err(|e| Error::ReferenceData(format!("Failed to parse reference TOML: {}", e)))?;

        for standard in &mut data.standards {
            if standard.tenant.is_empty() {
                standard.tenant = tenant.to_string();
            }
            let t = standard.thresholds();
            check_magnitude("standard_moisture_pct", t.moisture_pct)?;
            check_magnitude("standard_impurity_pct", t.impurity_pct)?;
            check_magnitude("standard_damage_pct", t.damage_pct)?;
            check_magnitude("drying_fee_pct", t.drying_fee_pct)?;
        }
        for rate in &mut data.warehouses {
            if rate.tenant.is_empty() {
                rate.tenant = tenant.to_string();
            }
            check_magnitude("technical_shrinkage_pct", rate.technical_shrinkage_pct)?;
        }

        Ok(data)
    }

    pub fn is_empty(&self) -> bool {
        self.standards.is_empty() && self.warehouses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use romaneio_domain::model::{FeeFrequency, PaymentUnit, DEFAULT_STANDARD};
    use rust_decimal::Decimal;

    const TEST_TOML: &str = r#"
[[standards]]
name = "Soja exportação"
crop = "Soja"
standard_moisture_pct = 13.0
drying_fee_pct = "1.50"

[[standards]]
name = "Milho"
crop = "Milho"
tenant = "other"

[[warehouses]]
supplier = "Armazém Central"
reception_fee_per_ton = 12.5
frequency = "monthly"
payment_unit = "bag"
technical_shrinkage_pct = 0.25
"#;

    #[test]
    fn test_load_from_str() {
        let data = ReferenceData::load_from_str(TEST_TOML, "acme").unwrap();
        assert_eq!(data.standards.len(), 2);
        assert_eq!(data.warehouses.len(), 1);
        assert!(!data.is_empty());
    }

    #[test]
    fn test_standard_fields_and_defaults() {
        let data = ReferenceData::load_from_str(TEST_TOML, "acme").unwrap();
        let soja = &data.standards[0];
        assert_eq!(soja.tenant, "acme");
        assert_eq!(soja.standard_moisture_pct, Decimal::new(13, 0));
        assert_eq!(soja.drying_fee_pct, Decimal::new(150, 2));
        assert_eq!(soja.standard_impurity_pct, DEFAULT_STANDARD.impurity_pct);
        assert!(!soja.id.is_empty());

        let milho = &data.standards[1];
        assert_eq!(milho.tenant, "other");
        assert_eq!(milho.thresholds(), DEFAULT_STANDARD);
    }

    #[test]
    fn test_warehouse_fields() {
        let data = ReferenceData::load_from_str(TEST_TOML, "acme").unwrap();
        let rate = &data.warehouses[0];
        assert_eq!(rate.technical_shrinkage_pct, Decimal::new(25, 2));
        assert_eq!(rate.reception_fee_per_ton, Decimal::new(125, 1));
        assert_eq!(rate.frequency, FeeFrequency::Monthly);
        assert_eq!(rate.payment_unit, PaymentUnit::Bag);
        assert!(rate.storage_fee.is_zero());
    }

    #[test]
    fn test_invalid_toml() {
        let result = ReferenceData::load_from_str("[[standards]]\nname = 1", "acme");
        assert!(matches!(result, Err(Error::ReferenceData(_))));
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let toml = r#"
[[standards]]
name = "Soja"
crop = "Soja"
standard_moisture_pct = "-50000000000000000000000000000"
"#;
        let err = ReferenceData::load_from_str(toml, "acme").unwrap_err();
        assert!(matches!(
            err,
            Error::Settlement(romaneio_types::SettlementError::InvalidInput {
                field: "standard_moisture_pct",
                ..
            })
        ));
    }
}
