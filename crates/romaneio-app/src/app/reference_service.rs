//! Reference Service - Classification Standards and Warehouse Rates
//!
//! Changing reference data does not touch stored tickets; they pick up the
//! new values on their next write or on an explicit recompute.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use romaneio_domain::model::{ClassificationStandard, WarehouseRate};
use romaneio_domain::{ClassificationStandardRepository, WarehouseRateRepository};
use romaneio_infra::reference_data_loader::ReferenceData;
use romaneio_types::{Error, Result};

/// Outcome of a bulk reference load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub standards_added: usize,
    pub standards_updated: usize,
    pub warehouses_added: usize,
    pub warehouses_updated: usize,
}

pub struct ReferenceService<'a, S, W> {
    standards: &'a S,
    warehouses: &'a W,
}

impl<'a, S, W> ReferenceService<'a, S, W>
where
    S: ClassificationStandardRepository,
    W: WarehouseRateRepository,
{
    pub fn new(standards: &'a S, warehouses: &'a W) -> Self {
        Self {
            standards,
            warehouses,
        }
    }

    /// Register a classification table; names are unique per tenant
    pub fn add_standard(&self, standard: ClassificationStandard) -> Result<ClassificationStandard> {
        if self.standard_named(&standard.tenant, &standard.name)?.is_some() {
            return Err(Error::ReferenceData(format!(
                "classification standard '{}' already exists",
                standard.name
            )));
        }
        self.standards.save(&standard)?;
        info!(standard = %standard, "Classification standard added");
        Ok(standard)
    }

    /// Register a warehouse rate; suppliers are unique per tenant
    pub fn add_warehouse(&self, rate: WarehouseRate) -> Result<WarehouseRate> {
        if self.warehouses.find_by_supplier(&rate.tenant, &rate.supplier)?.is_some() {
            return Err(Error::ReferenceData(format!(
                "warehouse '{}' already exists",
                rate.supplier
            )));
        }
        self.warehouses.save(&rate)?;
        info!(supplier = %rate.supplier, "Warehouse rate added");
        Ok(rate)
    }

    pub fn list_standards(&self, tenant: &str) -> Result<Vec<ClassificationStandard>> {
        self.standards.find_all(tenant)
    }

    pub fn list_warehouses(&self, tenant: &str) -> Result<Vec<WarehouseRate>> {
        self.warehouses.find_all(tenant)
    }

    pub fn delete_standard(&self, id: &str) -> Result<()> {
        if !self.standards.delete(id)? {
            return Err(Error::NotFound(format!("classification standard {}", id)));
        }
        Ok(())
    }

    pub fn delete_warehouse(&self, id: &str) -> Result<()> {
        if !self.warehouses.delete(id)? {
            return Err(Error::NotFound(format!("warehouse {}", id)));
        }
        Ok(())
    }

    /// Upsert parsed reference data.
    ///
    /// Standards match on name and warehouses on supplier; a match keeps its
    /// stored id so tickets pointing at it stay linked.
    pub fn load(&self, data: ReferenceData) -> Result<LoadSummary> {
        let mut summary = LoadSummary::default();

        for mut standard in data.standards {
            match self.standard_named(&standard.tenant, &standard.name)? {
                Some(existing) => {
                    standard.id = existing.id;
                    summary.standards_updated += 1;
                }
                None => summary.standards_added += 1,
            }
            self.standards.save(&standard)?;
        }

        for mut rate in data.warehouses {
            match self.warehouses.find_by_supplier(&rate.tenant, &rate.supplier)? {
                Some(existing) => {
                    rate.id = existing.id;
                    summary.warehouses_updated += 1;
                }
                None => summary.warehouses_added += 1,
            }
            self.warehouses.save(&rate)?;
        }

        info!(
            standards_added = summary.standards_added,
            standards_updated = summary.standards_updated,
            warehouses_added = summary.warehouses_added,
            warehouses_updated = summary.warehouses_updated,
            "Reference data loaded"
        );
        Ok(summary)
    }

    /// Load reference data from a TOML file
    pub fn load_file(&self, path: &Path, tenant: &str) -> Result<LoadSummary> {
        let data = ReferenceData::load_from_file(path, tenant)?;
        self.load(data)
    }

    fn standard_named(&self, tenant: &str, name: &str) -> Result<Option<ClassificationStandard>> {
        let wanted = name.trim().to_lowercase();
        Ok(self
            .standards
            .find_all(tenant)?
            .into_iter()
            .find(|s| s.name.trim().to_lowercase() == wanted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use romaneio_infra::persistence::{FileClassificationStandardRepository, FileWarehouseRateRepository};
    use rust_decimal::Decimal;
    use tempfile::tempdir;

    #[test]
    fn test_duplicate_names_rejected() {
        let dir = tempdir().unwrap();
        let standards = FileClassificationStandardRepository::open(dir.path().to_path_buf()).unwrap();
        let warehouses = FileWarehouseRateRepository::open(dir.path().to_path_buf()).unwrap();
        let service = ReferenceService::new(&standards, &warehouses);

        service
            .add_standard(ClassificationStandard::new("acme", "Padrão Soja", "Soja"))
            .unwrap();
        let dup = service.add_standard(ClassificationStandard::new("acme", "padrão soja", "Soja"));
        assert!(matches!(dup, Err(Error::ReferenceData(_))));

        service
            .add_warehouse(WarehouseRate::new("acme", "Armazém Central", Decimal::ONE))
            .unwrap();
        let dup = service.add_warehouse(WarehouseRate::new("acme", "ARMAZÉM CENTRAL", Decimal::ONE));
        assert!(matches!(dup, Err(Error::ReferenceData(_))));

        // Another tenant may reuse the names
        service
            .add_warehouse(WarehouseRate::new("other", "Armazém Central", Decimal::ONE))
            .unwrap();
    }

    #[test]
    fn test_load_upserts_keeping_ids() {
        let dir = tempdir().unwrap();
        let standards = FileClassificationStandardRepository::open(dir.path().to_path_buf()).unwrap();
        let warehouses = FileWarehouseRateRepository::open(dir.path().to_path_buf()).unwrap();
        let service = ReferenceService::new(&standards, &warehouses);

        let original = service
            .add_warehouse(WarehouseRate::new("acme", "Armazém Central", Decimal::ONE))
            .unwrap();

        let data = ReferenceData::load_from_str(
            r#"
[[standards]]
name = "Milho"
crop = "Milho"

[[warehouses]]
supplier = "Armazém Central"
technical_shrinkage_pct = 0.5
"#,
            "acme",
        )
        .unwrap();

        let summary = service.load(data).unwrap();
        assert_eq!(
            summary,
            LoadSummary {
                standards_added: 1,
                standards_updated: 0,
                warehouses_added: 0,
                warehouses_updated: 1,
            }
        );

        let rates = service.list_warehouses("acme").unwrap();
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].id, original.id);
        assert_eq!(rates[0].technical_shrinkage_pct, Decimal::new(5, 1));
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let standards = FileClassificationStandardRepository::open(dir.path().to_path_buf()).unwrap();
        let warehouses = FileWarehouseRateRepository::open(dir.path().to_path_buf()).unwrap();
        let service = ReferenceService::new(&standards, &warehouses);

        assert!(matches!(service.delete_standard("nope"), Err(Error::NotFound(_))));
        assert!(matches!(service.delete_warehouse("nope"), Err(Error::NotFound(_))));
    }
}
