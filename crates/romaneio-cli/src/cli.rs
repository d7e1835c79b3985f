//! CLI definition using clap

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use romaneio_domain::model::{FeeFrequency, PaymentUnit};
use romaneio_types::OutputFormat;

#[derive(Parser)]
#[command(name = "romaneio")]
#[command(author = "agrotalhoes")]
#[command(version)]
#[command(about = "Grain weighing ticket (romaneio) settlement")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Tenant (empresa). Uses config value if not specified.
    #[arg(long, global = true)]
    pub tenant: Option<String>,

    /// Data directory. Uses config value if not specified.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Settle raw readings without storing anything
    Calc {
        #[command(flatten)]
        readings: ReadingArgs,

        /// Standard moisture % (default 14)
        #[arg(long)]
        standard_moisture: Option<String>,

        /// Standard impurity % (default 1)
        #[arg(long)]
        standard_impurity: Option<String>,

        /// Standard damage % (default 0)
        #[arg(long)]
        standard_damage: Option<String>,

        /// Drying fee % (default 0)
        #[arg(long)]
        drying_fee: Option<String>,

        /// Warehouse technical shrinkage %
        #[arg(long)]
        shrinkage: Option<String>,
    },

    /// Manage weighing tickets
    Ticket {
        #[command(subcommand)]
        action: TicketCommand,
    },

    /// Manage classification standards
    Standard {
        #[command(subcommand)]
        action: StandardCommand,
    },

    /// Manage third-party warehouse rates
    Warehouse {
        #[command(subcommand)]
        action: WarehouseCommand,
    },

    /// Import tickets from a CSV export
    Import {
        /// Path to CSV file
        file: PathBuf,
    },

    /// Bulk load standards and warehouse rates from TOML
    LoadReference {
        /// Path to TOML file
        file: PathBuf,
    },

    /// Settle all stored tickets again with current reference data
    Recompute,

    /// Harvest report over stored tickets
    Report {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set default tenant
        #[arg(long)]
        set_tenant: Option<String>,

        /// Set data directory (empty string clears it)
        #[arg(long)]
        set_data_dir: Option<String>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set bag weight in kg
        #[arg(long)]
        set_bag_weight: Option<String>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}

/// Raw scale readings and operator overrides
#[derive(Args, Debug, Clone)]
pub struct ReadingArgs {
    /// Gross weight (kg)
    #[arg(long)]
    pub gross: String,

    /// Tare weight (kg)
    #[arg(long)]
    pub tare: String,

    /// Measured moisture %
    #[arg(long)]
    pub moisture: String,

    /// Measured impurity %
    #[arg(long)]
    pub impurity: String,

    /// Measured damage %
    #[arg(long)]
    pub damage: Option<String>,

    /// Manual moisture deduction (kg), replaces the computed one
    #[arg(long)]
    pub moisture_kg: Option<String>,

    /// Manual impurity deduction (kg)
    #[arg(long)]
    pub impurity_kg: Option<String>,

    /// Manual damage deduction (kg)
    #[arg(long)]
    pub damage_kg: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct TicketArgs {
    /// Ticket number printed on the slip
    #[arg(long, short = 'n')]
    pub number: String,

    /// Delivery date (YYYY-MM-DD). Today if not specified.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Farm (fazenda)
    #[arg(long)]
    pub farm: String,

    /// Field (talhão)
    #[arg(long)]
    pub field: String,

    /// Crop of the planting (e.g., "Soja")
    #[arg(long)]
    pub crop: Option<String>,

    /// Season of the planting (e.g., "24/25")
    #[arg(long)]
    pub season: Option<String>,

    /// Planting id. Derived from crop and season if not specified.
    #[arg(long)]
    pub planting: Option<String>,

    #[arg(long)]
    pub driver: Option<String>,

    #[arg(long, short = 'p')]
    pub plate: Option<String>,

    /// Warehouse id or supplier name
    #[arg(long, short = 'w')]
    pub warehouse: Option<String>,

    #[command(flatten)]
    pub readings: ReadingArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(long)]
    pub farm: Option<String>,

    #[arg(long)]
    pub season: Option<String>,

    /// Match ticket number, driver, or plate
    #[arg(long, short = 'q')]
    pub query: Option<String>,
}

#[derive(Subcommand)]
pub enum TicketCommand {
    /// Record a new ticket
    Add {
        #[command(flatten)]
        ticket: TicketArgs,
    },

    /// Replace the inputs of a stored ticket
    Update {
        /// Ticket id
        id: String,

        #[command(flatten)]
        ticket: TicketArgs,
    },

    /// List stored tickets, newest first
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// Limit number of tickets shown
        #[arg(long, short = 'l', default_value = "50")]
        limit: usize,
    },

    /// Show one ticket in detail
    Show {
        /// Ticket id
        id: String,
    },

    /// Delete a ticket
    Delete {
        /// Ticket id
        id: String,
    },
}

#[derive(Subcommand)]
pub enum StandardCommand {
    /// Register a classification standard
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        crop: String,

        /// Standard moisture % (default 14)
        #[arg(long)]
        moisture: Option<String>,

        /// Standard impurity % (default 1)
        #[arg(long)]
        impurity: Option<String>,

        /// Standard damage % (default 0)
        #[arg(long)]
        damage: Option<String>,

        /// Drying fee % (default 0)
        #[arg(long)]
        drying_fee: Option<String>,
    },

    /// List classification standards
    List,

    /// Delete a classification standard
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum WarehouseCommand {
    /// Register a warehouse rate
    Add {
        /// Warehouse / supplier name
        #[arg(long)]
        supplier: String,

        /// Technical shrinkage %
        #[arg(long)]
        shrinkage: String,

        /// Reception fee per ton
        #[arg(long)]
        reception_fee: Option<String>,

        #[arg(long)]
        storage_fee: Option<String>,

        /// Billing frequency (weekly, fortnightly, monthly)
        #[arg(long)]
        frequency: Option<FeeFrequency>,

        /// Payment unit (brl, bag)
        #[arg(long)]
        payment_unit: Option<PaymentUnit>,
    },

    /// List warehouse rates
    List,

    /// Delete a warehouse rate
    Delete {
        id: String,
    },
}
