//! Use cases over the stored tickets and reference data

pub mod query_service;
pub mod reference_service;
pub mod ticket_service;

pub use query_service::{harvest_summary, list_tickets};
pub use reference_service::{LoadSummary, ReferenceService};
pub use ticket_service::{ImportSummary, RecomputeSummary, TicketService};
