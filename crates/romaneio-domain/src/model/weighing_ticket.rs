use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::settlement::{ManualOverrides, Settlement, TicketMeasurements};

/// Standard bag (saca) of grain
pub const DEFAULT_BAG_WEIGHT_KG: Decimal = Decimal::from_parts(60, 0, 0, false, 0);

/// Production cycle (plantio) a delivery belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantingRef {
    pub id: String,
    pub crop: String,                        // cultura
    #[serde(default)]
    pub season: Option<String>,              // safra
}

/// One truckload delivered to a farm (romaneio)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeighingTicket {
    pub id: String,
    pub tenant: String,
    pub date: NaiveDate,
    pub ticket_number: String,               // nº ticket
    pub farm: String,                        // fazenda
    pub field: String,                       // talhão
    #[serde(default)]
    pub planting: Option<PlantingRef>,
    #[serde(default)]
    pub driver: Option<String>,              // motorista
    #[serde(default)]
    pub plate: Option<String>,               // placa
    pub measurements: TicketMeasurements,
    #[serde(default)]
    pub overrides: ManualOverrides,
    #[serde(default)]
    pub warehouse_id: Option<String>,        // armazém terceiro
    #[serde(default)]
    pub settlement: Settlement,
}

impl WeighingTicket {
    pub fn crop(&self) -> Option<&str> {
        self.planting.as_ref().map(|p| p.crop.as_str())
    }

    pub fn season(&self) -> Option<&str> {
        self.planting.as_ref().and_then(|p| p.season.as_deref())
    }

    /// Classification discount as reconstructed from the stored weights:
    /// load minus (net + shrinkage).
    pub fn classification_discount_kg(&self) -> Decimal {
        let s = &self.settlement;
        s.load_weight_kg - (s.net_weight_kg + s.shrinkage_kg)
    }

    /// Net weight expressed in bags
    pub fn bags(&self, bag_weight_kg: Decimal) -> Decimal {
        if bag_weight_kg.is_zero() {
            return Decimal::ZERO;
        }
        self.settlement.net_weight_kg / bag_weight_kg
    }

    /// Case-insensitive match against ticket number, driver, or plate
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let contains = |s: &str| s.to_lowercase().contains(&needle);
        contains(&self.ticket_number)
            || self.driver.as_deref().map(contains).unwrap_or(false)
            || self.plate.as_deref().map(contains).unwrap_or(false)
    }
}

/// A ticket as entered, before reference data is resolved and weights settled
#[derive(Debug, Clone, PartialEq)]
pub struct TicketDraft {
    pub tenant: String,
    pub date: NaiveDate,
    pub ticket_number: String,
    pub farm: String,
    pub field: String,
    pub planting: Option<PlantingRef>,
    pub driver: Option<String>,
    pub plate: Option<String>,
    pub measurements: TicketMeasurements,
    pub overrides: ManualOverrides,
    /// Warehouse rate id or supplier name
    pub warehouse: Option<String>,
}

impl TicketDraft {
    pub fn into_ticket(self, id: String, warehouse_id: Option<String>, settlement: Settlement) -> WeighingTicket {
        WeighingTicket {
            id,
            tenant: self.tenant,
            date: self.date,
            ticket_number: self.ticket_number,
            farm: self.farm,
            field: self.field,
            planting: self.planting,
            driver: self.driver,
            plate: self.plate,
            measurements: self.measurements,
            overrides: self.overrides,
            warehouse_id,
            settlement,
        }
    }
}

impl std::fmt::Display for WeighingTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Romaneio {} - {}kg", self.ticket_number, self.settlement.net_weight_kg)
    }
}
