//! Query Service - Access Stored Tickets
//!
//! Read-only listings and harvest totals over a tenant's tickets.

use rust_decimal::Decimal;
use tracing::debug;

use romaneio_domain::model::WeighingTicket;
use romaneio_domain::service::{summarize_harvest, HarvestSummary, TicketFilter};
use romaneio_domain::TicketRepository;
use romaneio_types::Result;

/// Tickets of a tenant matching `filter`, newest first
pub fn list_tickets<T: TicketRepository>(
    repo: &T,
    tenant: &str,
    filter: &TicketFilter,
) -> Result<Vec<WeighingTicket>> {
    let all = repo.find_all(tenant)?;
    let selected: Vec<WeighingTicket> = filter.apply(&all).into_iter().cloned().collect();
    debug!(tenant, total = all.len(), selected = selected.len(), "Listed tickets");
    Ok(selected)
}

/// Harvest totals over the tickets matching `filter`
pub fn harvest_summary<T: TicketRepository>(
    repo: &T,
    tenant: &str,
    filter: &TicketFilter,
    bag_weight_kg: Decimal,
) -> Result<HarvestSummary> {
    let all = repo.find_all(tenant)?;
    let selected = filter.apply(&all);
    Ok(summarize_harvest(&selected, bag_weight_kg))
}
