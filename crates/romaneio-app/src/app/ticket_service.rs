//! Ticket Service - Settle and Persist Weighing Tickets
//!
//! Every ticket write goes through this service:
//! 1. Reject a ticket number already used on the same farm
//! 2. Resolve the classification standard from the planting's crop
//! 3. Resolve the third-party warehouse rate
//! 4. Settle the weights
//! 5. Store the ticket with its derived weights

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use romaneio_domain::model::{
    new_id, ManualOverrides, PlantingRef, Settlement, StandardThresholds, TicketDraft,
    TicketMeasurements, WarehouseRate, WeighingTicket,
};
use romaneio_domain::service::settle;
use romaneio_domain::{ClassificationStandardRepository, TicketRepository, WarehouseRateRepository};
use romaneio_infra::ticket_csv::load_ticket_drafts;
use romaneio_types::{Error, Result};

/// Outcome of a bulk ticket import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub created: usize,
    /// Ticket numbers left out because they already existed
    pub skipped: Vec<String>,
}

/// Outcome of recomputing stored tickets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecomputeSummary {
    pub examined: usize,
    pub updated: usize,
}

pub struct TicketService<'a, T, S, W> {
    tickets: &'a T,
    standards: &'a S,
    warehouses: &'a W,
}

impl<'a, T, S, W> TicketService<'a, T, S, W>
where
    T: TicketRepository,
    S: ClassificationStandardRepository,
    W: WarehouseRateRepository,
{
    pub fn new(tickets: &'a T, standards: &'a S, warehouses: &'a W) -> Self {
        Self {
            tickets,
            standards,
            warehouses,
        }
    }

    /// Settle and store a new ticket
    pub fn create(&self, draft: TicketDraft) -> Result<WeighingTicket> {
        self.ensure_unique(&draft, None)?;

        let (warehouse_id, settlement) = self.settle_draft(&draft)?;
        let ticket = normalize(draft).into_ticket(new_id(), warehouse_id, settlement);
        self.tickets.save(&ticket)?;

        info!(
            ticket = %ticket.ticket_number,
            farm = %ticket.farm,
            net_kg = %ticket.settlement.net_weight_kg,
            "Ticket recorded"
        );
        Ok(ticket)
    }

    /// Replace the inputs of a stored ticket and settle it again
    pub fn update(&self, id: &str, mut draft: TicketDraft) -> Result<WeighingTicket> {
        let existing = self.get(id)?;
        draft.tenant = existing.tenant;
        self.ensure_unique(&draft, Some(id))?;

        let (warehouse_id, settlement) = self.settle_draft(&draft)?;
        let ticket = normalize(draft).into_ticket(existing.id, warehouse_id, settlement);
        self.tickets.save(&ticket)?;

        info!(
            ticket = %ticket.ticket_number,
            net_kg = %ticket.settlement.net_weight_kg,
            "Ticket updated"
        );
        Ok(ticket)
    }

    pub fn get(&self, id: &str) -> Result<WeighingTicket> {
        self.tickets
            .find_by_id(id)?
            .ok_or_else(|| Error::NotFound(format!("ticket {}", id)))
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        if !self.tickets.delete(id)? {
            return Err(Error::NotFound(format!("ticket {}", id)));
        }
        info!(id, "Ticket deleted");
        Ok(())
    }

    /// Settle every stored ticket of a tenant against the current reference data
    pub fn recompute_all(&self, tenant: &str) -> Result<RecomputeSummary> {
        let mut summary = RecomputeSummary::default();

        for mut ticket in self.tickets.find_all(tenant)? {
            summary.examined += 1;

            let (warehouse_id, settlement) = self.settle_inputs(
                &ticket.tenant,
                ticket.planting.as_ref(),
                &ticket.measurements,
                &ticket.overrides,
                ticket.warehouse_id.as_deref(),
            )?;
            if warehouse_id == ticket.warehouse_id && settlement == ticket.settlement {
                continue;
            }

            debug!(ticket = %ticket.ticket_number, "Settlement changed");
            ticket.warehouse_id = warehouse_id;
            ticket.settlement = settlement;
            self.tickets.save(&ticket)?;
            summary.updated += 1;
        }

        info!(
            tenant,
            examined = summary.examined,
            updated = summary.updated,
            "Recomputed tickets"
        );
        Ok(summary)
    }

    /// Create each draft in turn; ticket numbers already on file are skipped
    pub fn import(&self, drafts: Vec<TicketDraft>) -> Result<ImportSummary> {
        let mut summary = ImportSummary::default();

        for draft in drafts {
            match self.create(draft) {
                Ok(_) => summary.created += 1,
                Err(Error::DuplicateTicket { ticket_number, farm }) => {
                    warn!(ticket = %ticket_number, farm = %farm, "Skipping duplicate ticket");
                    summary.skipped.push(ticket_number);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(summary)
    }

    /// Import tickets from a CSV file
    pub fn import_csv(&self, path: &Path, tenant: &str) -> Result<ImportSummary> {
        let drafts = load_ticket_drafts(path, tenant).map_err(|e| Error::CsvImport(e.to_string()))?;
        info!(path = %path.display(), rows = drafts.len(), "Importing tickets");

        let summary = self.import(drafts)?;
        info!(
            created = summary.created,
            skipped = summary.skipped.len(),
            "Import finished"
        );
        Ok(summary)
    }

    fn ensure_unique(&self, draft: &TicketDraft, own_id: Option<&str>) -> Result<()> {
        let existing = self
            .tickets
            .find_by_number(&draft.tenant, &draft.farm, &draft.ticket_number)?;

        match existing {
            Some(other) if Some(other.id.as_str()) != own_id => Err(Error::DuplicateTicket {
                ticket_number: draft.ticket_number.clone(),
                farm: draft.farm.clone(),
            }),
            _ => Ok(()),
        }
    }

    fn settle_draft(&self, draft: &TicketDraft) -> Result<(Option<String>, Settlement)> {
        self.settle_inputs(
            &draft.tenant,
            draft.planting.as_ref(),
            &draft.measurements,
            &draft.overrides,
            draft.warehouse.as_deref(),
        )
    }

    fn settle_inputs(
        &self,
        tenant: &str,
        planting: Option<&PlantingRef>,
        measurements: &TicketMeasurements,
        overrides: &ManualOverrides,
        warehouse: Option<&str>,
    ) -> Result<(Option<String>, Settlement)> {
        let standard = self.resolve_standard(tenant, planting)?;
        let rate = self.resolve_warehouse(tenant, warehouse)?;

        let settlement = settle(
            measurements,
            overrides,
            standard.as_ref(),
            rate.as_ref().map(|r| r.technical_shrinkage_pct),
        );
        Ok((rate.map(|r| r.id), settlement))
    }

    fn resolve_standard(
        &self,
        tenant: &str,
        planting: Option<&PlantingRef>,
    ) -> Result<Option<StandardThresholds>> {
        let Some(planting) = planting else {
            debug!("No planting on ticket, using default standard");
            return Ok(None);
        };

        match self.standards.find_for_crop(tenant, &planting.crop)? {
            Some(standard) => {
                debug!(standard = %standard, "Classification standard found");
                Ok(Some(standard.thresholds()))
            }
            None => {
                warn!(crop = %planting.crop, tenant, "No classification standard for crop, using default");
                Ok(None)
            }
        }
    }

    /// Look a warehouse up by id, then by supplier name
    fn resolve_warehouse(&self, tenant: &str, reference: Option<&str>) -> Result<Option<WarehouseRate>> {
        let Some(reference) = reference.map(str::trim).filter(|r| !r.is_empty()) else {
            return Ok(None);
        };

        let rate = match self.warehouses.find_by_id(reference)? {
            Some(rate) if rate.tenant == tenant => Some(rate),
            _ => self.warehouses.find_by_supplier(tenant, reference)?,
        };

        if rate.is_none() {
            warn!(warehouse = reference, tenant, "Unknown warehouse, no shrinkage applied");
        }
        Ok(rate)
    }
}

fn normalize(mut draft: TicketDraft) -> TicketDraft {
    draft.overrides = draft.overrides.normalized();
    draft
}
