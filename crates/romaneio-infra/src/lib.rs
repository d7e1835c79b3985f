//! Infrastructure layer
//!
//! Concrete implementations of the domain repositories plus loaders for
//! reference data (TOML) and scale-house ticket exports (CSV).

pub mod persistence;
pub mod reference_data_loader;
pub mod ticket_csv;
