//! File-based classification standard repository implementation

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use romaneio_domain::model::ClassificationStandard;
use romaneio_domain::repository::ClassificationStandardRepository;
use romaneio_types::{Error, Result};

use super::json_file::{load_records, write_records};

/// Stores classification tables keyed by id in `standards.json`
pub struct FileClassificationStandardRepository {
    store_path: PathBuf,
    standards: RefCell<HashMap<String, ClassificationStandard>>,
}

impl FileClassificationStandardRepository {
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join("standards.json");
        let standards = load_records(&store_path)?;

        Ok(Self {
            store_path,
            standards: RefCell::new(standards),
        })
    }

    fn persist(&self) -> Result<()> {
        write_records(&self.store_path, &*self.standards.borrow())
    }

    fn sorted(&self, tenant: &str) -> Vec<ClassificationStandard> {
        let mut standards: Vec<_> = self
            .standards
            .borrow()
            .values()
            .filter(|s| s.tenant == tenant)
            .cloned()
            .collect();
        standards.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        standards
    }
}

impl ClassificationStandardRepository for FileClassificationStandardRepository {
    fn save(&self, standard: &ClassificationStandard) -> std::result::Result<(), Error> {
        self.standards
            .borrow_mut()
            .insert(standard.id.clone(), standard.clone());
        self.persist()
    }

    fn find_for_crop(
        &self,
        tenant: &str,
        crop: &str,
    ) -> std::result::Result<Option<ClassificationStandard>, Error> {
        Ok(self
            .sorted(tenant)
            .into_iter()
            .find(|s| s.applies_to(tenant, crop)))
    }

    fn find_all(&self, tenant: &str) -> std::result::Result<Vec<ClassificationStandard>, Error> {
        Ok(self.sorted(tenant))
    }

    fn delete(&self, id: &str) -> std::result::Result<bool, Error> {
        let removed = self.standards.borrow_mut().remove(id).is_some();
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }
}
