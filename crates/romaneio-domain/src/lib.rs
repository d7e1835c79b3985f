//! Domain module containing weighing-ticket types and services

pub mod model;
pub mod repository;
pub mod service;

pub use model::*;
pub use repository::{
    ClassificationStandardRepository, TicketRepository, WarehouseRateRepository,
};
