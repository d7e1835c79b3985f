//! Configuration management for romaneio
//!
//! Config stored at: ~/.config/romaneio/config.json

use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use romaneio_domain::model::DEFAULT_BAG_WEIGHT_KG;
use romaneio_domain::service::parse_decimal;
use romaneio_types::{ConfigError, OutputFormat, Result};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Data directory override (tickets and reference data)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Tenant (empresa) whose records are read and written
    #[serde(default = "default_tenant")]
    pub tenant: String,

    /// Default output format (json, table)
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Weight of one bag (saca) in kg
    #[serde(default = "default_bag_weight")]
    pub bag_weight_kg: Decimal,
}

fn default_tenant() -> String {
    "default".to_string()
}

fn default_bag_weight() -> Decimal {
    DEFAULT_BAG_WEIGHT_KG
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            tenant: default_tenant(),
            output_format: OutputFormat::default(),
            bag_weight_kg: default_bag_weight(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("romaneio");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or(ConfigError::NotFound)?
            .join("romaneio");
        Ok(data_dir)
    }

    /// Load config from the default location, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Set a single key from its textual value
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "data_dir" => {
                self.data_dir = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                }
            }
            "tenant" => self.tenant = value.to_string(),
            "output_format" => {
                self.output_format = match value.to_lowercase().as_str() {
                    "table" => OutputFormat::Table,
                    "json" => OutputFormat::Json,
                    other => {
                        return Err(ConfigError::ParseError(format!("unknown output format: {other}")).into())
                    }
                }
            }
            "bag_weight_kg" => self.bag_weight_kg = parse_decimal("bag_weight_kg", value)?,
            other => return Err(ConfigError::UnknownKey(other.to_string()).into()),
        }
        Ok(())
    }
}

impl FromStr for Config {
    type Err = romaneio_types::Error;

    fn from_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| ConfigError::ParseError(e.to_string()).into())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Romaneio Configuration")?;
        writeln!(f, "======================")?;
        writeln!(f)?;
        writeln!(f, "Tenant:         {}", self.tenant)?;
        writeln!(
            f,
            "Data dir:       {}",
            self.data_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "Output format:  {}", self.output_format)?;
        writeln!(f, "Bag weight:     {} kg", self.bag_weight_kg)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:    {}", path.display())?;
        }

        Ok(())
    }
}
