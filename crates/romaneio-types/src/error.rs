//! Error types for romaneio

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Raised while turning raw ticket measurements into decimals.
///
/// Always caller-fatal: a ticket that fails here must not be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    #[error("Invalid value for {field}: {value:?} is not a decimal number within ±1000000000")]
    InvalidInput { field: &'static str, value: String },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Settlement input error: {0}")]
    Settlement(#[from] SettlementError),

    #[error("Reference data error: {0}")]
    ReferenceData(String),

    #[error("CSV import error: {0}")]
    CsvImport(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Ticket {ticket_number} already exists for farm {farm}")]
    DuplicateTicket { ticket_number: String, farm: String },
}

pub type Result<T> = std::result::Result<T, Error>;
