//! Persistence implementations
//!
//! File-based implementations of the domain repository traits, one JSON
//! file per record kind inside the data directory.

mod file_standard_repo;
mod file_ticket_repo;
mod file_warehouse_repo;
mod json_file;

pub use file_standard_repo::FileClassificationStandardRepository;
pub use file_ticket_repo::FileTicketRepository;
pub use file_warehouse_repo::FileWarehouseRateRepository;
