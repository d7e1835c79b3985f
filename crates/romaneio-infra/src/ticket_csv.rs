//! CSV loader for scale-house ticket exports
//!
//! Exports come from Windows scale software as often as from spreadsheets,
//! so the file is read as UTF-8 and falls back to Windows-1252. Both `,` and
//! `;` delimiters are accepted. A `;` file is a Brazilian-locale export, so
//! its numbers are read as `1.234,56` with the dot grouping thousands; in a
//! `,` file either decimal separator is accepted.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use encoding_rs::WINDOWS_1252;
use thiserror::Error;
use tracing::{debug, warn};

use romaneio_domain::model::{ManualOverrides, PlantingRef, TicketDraft};
use romaneio_domain::service::{NumberStyle, RawMeasurements};
use romaneio_types::SettlementError;

#[derive(Error, Debug)]
pub enum CsvLoaderError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("Missing value in row {row}, column {column}")]
    MissingValue { row: usize, column: &'static str },

    #[error("Invalid date format in row {row}: {value}")]
    InvalidDate { row: usize, value: String },

    #[error("Invalid number in row {row}: {source}")]
    InvalidNumber {
        row: usize,
        #[source]
        source: SettlementError,
    },
}

const REQUIRED_COLUMNS: [&str; 10] = [
    "ticket",
    "date",
    "farm",
    "field",
    "gross_kg",
    "tare_kg",
    "moisture_pct",
    "impurity_pct",
    "crop",
    "season",
];

/// Load ticket drafts from a CSV file
///
/// Expected header (order free, names case-insensitive):
/// ticket,date,farm,field,crop,season,gross_kg,tare_kg,moisture_pct,impurity_pct
/// [,driver,plate,damage_pct,planting,moisture_kg,impurity_kg,damage_kg,warehouse]
pub fn load_ticket_drafts<P: AsRef<Path>>(path: P, tenant: &str) -> Result<Vec<TicketDraft>, CsvLoaderError> {
    let bytes = fs::read(path.as_ref())?;
    let content = decode(&bytes);
    parse_ticket_drafts(&content, tenant)
}

fn decode(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.trim_start_matches('\u{feff}').to_string(),
        Err(_) => {
            let (decoded, _, had_errors) = WINDOWS_1252.decode(bytes);
            if had_errors {
                warn!("Some characters could not be decoded from Windows-1252");
            } else {
                debug!("CSV is not UTF-8, decoded as Windows-1252");
            }
            decoded.into_owned()
        }
    }
}

/// Parse ticket drafts from already-decoded CSV text
pub fn parse_ticket_drafts(content: &str, tenant: &str) -> Result<Vec<TicketDraft>, CsvLoaderError> {
    let header_line = content.lines().next().unwrap_or("");
    let (delimiter, style) = if header_line.contains(';') && !header_line.contains(',') {
        (b';', NumberStyle::Brazilian)
    } else {
        (b',', NumberStyle::Auto)
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let columns: HashMap<String, usize> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.to_lowercase(), i))
        .collect();
    for col in REQUIRED_COLUMNS {
        if !columns.contains_key(col) {
            return Err(CsvLoaderError::MissingColumn(col));
        }
    }

    let mut drafts = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        let row = Row {
            record: &record,
            columns: &columns,
            // +2: 0-based index and the header line
            number: row_idx + 2,
            style,
        };
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        drafts.push(row.to_draft(tenant)?);
    }

    Ok(drafts)
}

struct Row<'a> {
    record: &'a csv::StringRecord,
    columns: &'a HashMap<String, usize>,
    number: usize,
    style: NumberStyle,
}

impl Row<'_> {
    fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .get(column)
            .and_then(|&i| self.record.get(i))
            .filter(|s| !s.is_empty())
    }

    fn required(&self, column: &'static str) -> Result<String, CsvLoaderError> {
        self.get(column)
            .map(str::to_string)
            .ok_or(CsvLoaderError::MissingValue {
                row: self.number,
                column,
            })
    }

    fn optional(&self, column: &str) -> Option<String> {
        self.get(column).map(str::to_string)
    }

    fn decimal(&self, column: &'static str) -> Result<Option<rust_decimal::Decimal>, CsvLoaderError> {
        self.style
            .parse_optional(column, self.get(column))
            .map_err(|source| CsvLoaderError::InvalidNumber {
                row: self.number,
                source,
            })
    }

    fn to_draft(&self, tenant: &str) -> Result<TicketDraft, CsvLoaderError> {
        let date_str = self.required("date")?;
        let date = parse_date(&date_str, self.number)?;

        let measurements = RawMeasurements {
            gross_weight_kg: self.get("gross_kg"),
            tare_weight_kg: self.get("tare_kg"),
            moisture_pct: self.get("moisture_pct"),
            impurity_pct: self.get("impurity_pct"),
            damage_pct: self.get("damage_pct"),
        }
        .parse_with(self.style)
        .map_err(|source| CsvLoaderError::InvalidNumber {
            row: self.number,
            source,
        })?;

        let overrides = ManualOverrides {
            moisture_kg: self.decimal("moisture_kg")?,
            impurity_kg: self.decimal("impurity_kg")?,
            damage_kg: self.decimal("damage_kg")?,
        };

        let planting = self.optional("crop").map(|crop| {
            let season = self.optional("season");
            let id = self
                .optional("planting")
                .unwrap_or_else(|| planting_id(&crop, season.as_deref()));
            PlantingRef { id, crop, season }
        });

        Ok(TicketDraft {
            tenant: tenant.to_string(),
            date,
            ticket_number: self.required("ticket")?,
            farm: self.required("farm")?,
            field: self.required("field")?,
            planting,
            driver: self.optional("driver"),
            plate: self.optional("plate"),
            measurements,
            overrides,
            warehouse: self.optional("warehouse"),
        })
    }
}

/// Planting id derived from crop and season when the export has none
pub fn planting_id(crop: &str, season: Option<&str>) -> String {
    match season {
        Some(season) => format!("{}-{}", crop.to_lowercase(), season),
        None => crop.to_lowercase(),
    }
}

fn parse_date(s: &str, row: usize) -> Result<NaiveDate, CsvLoaderError> {
    let formats = ["%Y-%m-%d", "%d/%m/%y", "%d/%m/%Y"];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    Err(CsvLoaderError::InvalidDate {
        row,
        value: s.to_string(),
    })
}
