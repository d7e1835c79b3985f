//! Domain services

pub mod harvest_report;
pub mod settlement_calculator;

pub use harvest_report::{
    generate_harvest_report, summarize_harvest, truncate, HarvestSummary, PlantingTotal, TicketFilter,
};
pub use settlement_calculator::{
    check_magnitude, parse_decimal, parse_optional, settle, NumberStyle, RawMeasurements, MAX_MAGNITUDE,
};
