//! Domain model types

pub mod classification_standard;
pub mod settlement;
pub mod warehouse_rate;
pub mod weighing_ticket;

pub use classification_standard::{ClassificationStandard, StandardThresholds, DEFAULT_STANDARD};
pub use settlement::{format_2dp, round_half_away, ManualOverrides, Settlement, TicketMeasurements};
pub use warehouse_rate::{FeeFrequency, PaymentUnit, WarehouseRate};
pub use weighing_ticket::{PlantingRef, TicketDraft, WeighingTicket, DEFAULT_BAG_WEIGHT_KG};

/// Generate a fresh record id
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
