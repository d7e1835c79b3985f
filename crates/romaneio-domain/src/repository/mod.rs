//! Repository trait definitions for data persistence

use crate::model::{ClassificationStandard, WarehouseRate, WeighingTicket};
use romaneio_types::Error;

/// Repository for weighing tickets (romaneios)
pub trait TicketRepository {
    /// Insert or replace a ticket by id
    fn save(&self, ticket: &WeighingTicket) -> Result<(), Error>;

    fn find_by_id(&self, id: &str) -> Result<Option<WeighingTicket>, Error>;

    /// Find a ticket by its number within a tenant's farm
    fn find_by_number(
        &self,
        tenant: &str,
        farm: &str,
        ticket_number: &str,
    ) -> Result<Option<WeighingTicket>, Error>;

    /// All tickets of a tenant
    fn find_all(&self, tenant: &str) -> Result<Vec<WeighingTicket>, Error>;

    /// Remove a ticket, returning whether it existed
    fn delete(&self, id: &str) -> Result<bool, Error>;
}

/// Repository for classification standards (tabelas de classificação)
pub trait ClassificationStandardRepository {
    fn save(&self, standard: &ClassificationStandard) -> Result<(), Error>;

    /// First table of the tenant whose crop matches case-insensitively,
    /// ordered by table name
    fn find_for_crop(&self, tenant: &str, crop: &str) -> Result<Option<ClassificationStandard>, Error>;

    fn find_all(&self, tenant: &str) -> Result<Vec<ClassificationStandard>, Error>;

    fn delete(&self, id: &str) -> Result<bool, Error>;
}

/// Repository for third-party warehouse rates (taxas de armazém)
pub trait WarehouseRateRepository {
    fn save(&self, rate: &WarehouseRate) -> Result<(), Error>;

    fn find_by_id(&self, id: &str) -> Result<Option<WarehouseRate>, Error>;

    fn find_by_supplier(&self, tenant: &str, supplier: &str) -> Result<Option<WarehouseRate>, Error>;

    fn find_all(&self, tenant: &str) -> Result<Vec<WarehouseRate>, Error>;

    fn delete(&self, id: &str) -> Result<bool, Error>;
}
