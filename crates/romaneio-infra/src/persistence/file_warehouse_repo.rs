//! File-based warehouse rate repository implementation

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use romaneio_domain::model::WarehouseRate;
use romaneio_domain::repository::WarehouseRateRepository;
use romaneio_types::{Error, Result};

use super::json_file::{load_records, write_records};

/// Stores warehouse rates keyed by id in `warehouses.json`
pub struct FileWarehouseRateRepository {
    store_path: PathBuf,
    rates: RefCell<HashMap<String, WarehouseRate>>,
}

impl FileWarehouseRateRepository {
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join("warehouses.json");
        let rates = load_records(&store_path)?;

        Ok(Self {
            store_path,
            rates: RefCell::new(rates),
        })
    }

    fn persist(&self) -> Result<()> {
        write_records(&self.store_path, &*self.rates.borrow())
    }
}

impl WarehouseRateRepository for FileWarehouseRateRepository {
    fn save(&self, rate: &WarehouseRate) -> std::result::Result<(), Error> {
        self.rates.borrow_mut().insert(rate.id.clone(), rate.clone());
        self.persist()
    }

    fn find_by_id(&self, id: &str) -> std::result::Result<Option<WarehouseRate>, Error> {
        Ok(self.rates.borrow().get(id).cloned())
    }

    fn find_by_supplier(
        &self,
        tenant: &str,
        supplier: &str,
    ) -> std::result::Result<Option<WarehouseRate>, Error> {
        let wanted = supplier.trim().to_lowercase();
        Ok(self
            .rates
            .borrow()
            .values()
            .find(|r| r.tenant == tenant && r.supplier.trim().to_lowercase() == wanted)
            .cloned())
    }

    fn find_all(&self, tenant: &str) -> std::result::Result<Vec<WarehouseRate>, Error> {
        let mut rates: Vec<_> = self
            .rates
            .borrow()
            .values()
            .filter(|r| r.tenant == tenant)
            .cloned()
            .collect();
        rates.sort_by(|a, b| a.supplier.cmp(&b.supplier));
        Ok(rates)
    }

    fn delete(&self, id: &str) -> std::result::Result<bool, Error> {
        let removed = self.rates.borrow_mut().remove(id).is_some();
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }
}
