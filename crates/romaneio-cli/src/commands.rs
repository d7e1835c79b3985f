//! Command implementations

use std::path::Path;

use rust_decimal::Decimal;
use tracing::debug;

use romaneio_app::app::{harvest_summary, list_tickets, ReferenceService, TicketService};
use romaneio_app::config::Config;
use romaneio_app::repository::{open_standard_repo, open_ticket_repo, open_warehouse_repo};
use romaneio_domain::model::{
    ClassificationStandard, ManualOverrides, PlantingRef, StandardThresholds, TicketDraft,
    TicketMeasurements, WarehouseRate, WeighingTicket, DEFAULT_STANDARD,
};
use romaneio_domain::service::{parse_decimal, parse_optional, settle, RawMeasurements, TicketFilter};
use romaneio_domain::WarehouseRateRepository;
use romaneio_infra::ticket_csv::planting_id;
use romaneio_types::{OutputFormat, Result};

use crate::cli::{
    Cli, Commands, FilterArgs, ReadingArgs, StandardCommand, TicketArgs, TicketCommand,
    WarehouseCommand,
};
use crate::output::{
    output_json, output_settlement, output_standards, output_summary, output_ticket,
    output_tickets, output_warehouses,
};

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref tenant) = cli.tenant {
        config.tenant = tenant.clone();
    }
    if let Some(ref dir) = cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    let format = cli.format.unwrap_or(config.output_format);
    debug!(tenant = %config.tenant, %format, "Configuration loaded");

    match cli.command {
        Commands::Calc {
            readings,
            standard_moisture,
            standard_impurity,
            standard_damage,
            drying_fee,
            shrinkage,
        } => {
            let standard = StandardThresholds {
                moisture_pct: or_default("standard_moisture", standard_moisture, DEFAULT_STANDARD.moisture_pct)?,
                impurity_pct: or_default("standard_impurity", standard_impurity, DEFAULT_STANDARD.impurity_pct)?,
                damage_pct: or_default("standard_damage", standard_damage, DEFAULT_STANDARD.damage_pct)?,
                drying_fee_pct: or_default("drying_fee", drying_fee, DEFAULT_STANDARD.drying_fee_pct)?,
            };
            let shrinkage = parse_optional("shrinkage", shrinkage.as_deref())?;
            cmd_calc(format, &readings, &standard, shrinkage)
        }
        Commands::Ticket { action } => cmd_ticket(&config, format, action),
        Commands::Standard { action } => cmd_standard(&config, format, action),
        Commands::Warehouse { action } => cmd_warehouse(&config, format, action),
        Commands::Import { file } => cmd_import(&config, format, &file),
        Commands::LoadReference { file } => cmd_load_reference(&config, format, &file),
        Commands::Recompute => cmd_recompute(&config, format),
        Commands::Report { filter } => cmd_report(&config, format, filter),
        Commands::Config {
            show,
            set_tenant,
            set_data_dir,
            set_output,
            set_bag_weight,
            reset,
        } => cmd_config(show, set_tenant, set_data_dir, set_output, set_bag_weight, reset),
    }
}

fn or_default(field: &'static str, value: Option<String>, default: Decimal) -> Result<Decimal> {
    Ok(parse_optional(field, value.as_deref())?.unwrap_or(default))
}

fn parse_readings(readings: &ReadingArgs) -> Result<(TicketMeasurements, ManualOverrides)> {
    let measurements = RawMeasurements {
        gross_weight_kg: Some(readings.gross.as_str()),
        tare_weight_kg: Some(readings.tare.as_str()),
        moisture_pct: Some(readings.moisture.as_str()),
        impurity_pct: Some(readings.impurity.as_str()),
        damage_pct: readings.damage.as_deref(),
    }
    .parse()?;

    let overrides = ManualOverrides {
        moisture_kg: parse_optional("moisture_kg", readings.moisture_kg.as_deref())?,
        impurity_kg: parse_optional("impurity_kg", readings.impurity_kg.as_deref())?,
        damage_kg: parse_optional("damage_kg", readings.damage_kg.as_deref())?,
    };

    Ok((measurements, overrides))
}

fn cmd_calc(
    format: OutputFormat,
    readings: &ReadingArgs,
    standard: &StandardThresholds,
    shrinkage: Option<Decimal>,
) -> Result<()> {
    let (measurements, overrides) = parse_readings(readings)?;
    let settlement = settle(&measurements, &overrides, Some(standard), shrinkage);
    output_settlement(format, &settlement)
}

fn build_draft(config: &Config, args: TicketArgs) -> Result<TicketDraft> {
    let (measurements, overrides) = parse_readings(&args.readings)?;

    let planting = args.crop.map(|crop| {
        let id = args
            .planting
            .unwrap_or_else(|| planting_id(&crop, args.season.as_deref()));
        PlantingRef {
            id,
            crop,
            season: args.season,
        }
    });

    Ok(TicketDraft {
        tenant: config.tenant.clone(),
        date: args
            .date
            .unwrap_or_else(|| chrono::Local::now().date_naive()),
        ticket_number: args.number,
        farm: args.farm,
        field: args.field,
        planting,
        driver: args.driver,
        plate: args.plate,
        measurements,
        overrides,
        warehouse: args.warehouse,
    })
}

fn cmd_ticket(config: &Config, format: OutputFormat, action: TicketCommand) -> Result<()> {
    let tickets = open_ticket_repo(config)?;
    let standards = open_standard_repo(config)?;
    let warehouses = open_warehouse_repo(config)?;
    let service = TicketService::new(&tickets, &standards, &warehouses);

    match action {
        TicketCommand::Add { ticket } => {
            let ticket = service.create(build_draft(config, ticket)?)?;
            show_ticket(config, format, &warehouses, &ticket)
        }
        TicketCommand::Update { id, ticket } => {
            let ticket = service.update(&id, build_draft(config, ticket)?)?;
            show_ticket(config, format, &warehouses, &ticket)
        }
        TicketCommand::List { filter, limit } => {
            let listed = list_tickets(&tickets, &config.tenant, &to_filter(filter))?;
            output_tickets(format, &listed, limit)
        }
        TicketCommand::Show { id } => {
            let ticket = service.get(&id)?;
            show_ticket(config, format, &warehouses, &ticket)
        }
        TicketCommand::Delete { id } => {
            service.delete(&id)?;
            println!("Deleted ticket {}", id);
            Ok(())
        }
    }
}

fn show_ticket<W: WarehouseRateRepository>(
    config: &Config,
    format: OutputFormat,
    warehouses: &W,
    ticket: &WeighingTicket,
) -> Result<()> {
    let rate = match ticket.warehouse_id {
        Some(ref id) => warehouses.find_by_id(id)?,
        None => None,
    };
    output_ticket(format, ticket, rate.as_ref(), config.bag_weight_kg)
}

fn cmd_standard(config: &Config, format: OutputFormat, action: StandardCommand) -> Result<()> {
    let standards = open_standard_repo(config)?;
    let warehouses = open_warehouse_repo(config)?;
    let service = ReferenceService::new(&standards, &warehouses);

    match action {
        StandardCommand::Add {
            name,
            crop,
            moisture,
            impurity,
            damage,
            drying_fee,
        } => {
            let mut standard = ClassificationStandard::new(config.tenant.clone(), name, crop);
            standard.standard_moisture_pct = or_default("moisture", moisture, standard.standard_moisture_pct)?;
            standard.standard_impurity_pct = or_default("impurity", impurity, standard.standard_impurity_pct)?;
            standard.standard_damage_pct = or_default("damage", damage, standard.standard_damage_pct)?;
            standard.drying_fee_pct = or_default("drying_fee", drying_fee, standard.drying_fee_pct)?;

            let standard = service.add_standard(standard)?;
            output_standards(format, std::slice::from_ref(&standard))
        }
        StandardCommand::List => output_standards(format, &service.list_standards(&config.tenant)?),
        StandardCommand::Delete { id } => {
            service.delete_standard(&id)?;
            println!("Deleted classification standard {}", id);
            Ok(())
        }
    }
}

fn cmd_warehouse(config: &Config, format: OutputFormat, action: WarehouseCommand) -> Result<()> {
    let standards = open_standard_repo(config)?;
    let warehouses = open_warehouse_repo(config)?;
    let service = ReferenceService::new(&standards, &warehouses);

    match action {
        WarehouseCommand::Add {
            supplier,
            shrinkage,
            reception_fee,
            storage_fee,
            frequency,
            payment_unit,
        } => {
            let shrinkage = parse_decimal("shrinkage", &shrinkage)?;
            let mut rate = WarehouseRate::new(config.tenant.clone(), supplier, shrinkage);
            rate.reception_fee_per_ton = or_default("reception_fee", reception_fee, Decimal::ZERO)?;
            rate.storage_fee = or_default("storage_fee", storage_fee, Decimal::ZERO)?;
            rate.frequency = frequency.unwrap_or_default();
            rate.payment_unit = payment_unit.unwrap_or_default();

            let rate = service.add_warehouse(rate)?;
            output_warehouses(format, std::slice::from_ref(&rate))
        }
        WarehouseCommand::List => output_warehouses(format, &service.list_warehouses(&config.tenant)?),
        WarehouseCommand::Delete { id } => {
            service.delete_warehouse(&id)?;
            println!("Deleted warehouse rate {}", id);
            Ok(())
        }
    }
}

fn cmd_import(config: &Config, format: OutputFormat, file: &Path) -> Result<()> {
    let tickets = open_ticket_repo(config)?;
    let standards = open_standard_repo(config)?;
    let warehouses = open_warehouse_repo(config)?;
    let service = TicketService::new(&tickets, &standards, &warehouses);

    let summary = service.import_csv(file, &config.tenant)?;
    if format == OutputFormat::Json {
        return output_json(&summary);
    }

    println!("Imported {} ticket(s) from {}", summary.created, file.display());
    if !summary.skipped.is_empty() {
        println!("Skipped {} existing ticket(s): {}", summary.skipped.len(), summary.skipped.join(", "));
    }
    Ok(())
}

fn cmd_load_reference(config: &Config, format: OutputFormat, file: &Path) -> Result<()> {
    let standards = open_standard_repo(config)?;
    let warehouses = open_warehouse_repo(config)?;
    let service = ReferenceService::new(&standards, &warehouses);

    let summary = service.load_file(file, &config.tenant)?;
    if format == OutputFormat::Json {
        return output_json(&summary);
    }

    println!(
        "Standards: {} added, {} updated",
        summary.standards_added, summary.standards_updated
    );
    println!(
        "Warehouses: {} added, {} updated",
        summary.warehouses_added, summary.warehouses_updated
    );
    println!("Run 'romaneio recompute' to apply the changes to stored tickets.");
    Ok(())
}

fn cmd_recompute(config: &Config, format: OutputFormat) -> Result<()> {
    let tickets = open_ticket_repo(config)?;
    let standards = open_standard_repo(config)?;
    let warehouses = open_warehouse_repo(config)?;
    let service = TicketService::new(&tickets, &standards, &warehouses);

    let summary = service.recompute_all(&config.tenant)?;
    if format == OutputFormat::Json {
        return output_json(&summary);
    }

    println!(
        "Recomputed {} ticket(s), {} changed",
        summary.examined, summary.updated
    );
    Ok(())
}

fn cmd_report(config: &Config, format: OutputFormat, filter: FilterArgs) -> Result<()> {
    let tickets = open_ticket_repo(config)?;
    let summary = harvest_summary(&tickets, &config.tenant, &to_filter(filter), config.bag_weight_kg)?;
    output_summary(format, &summary)
}

fn to_filter(args: FilterArgs) -> TicketFilter {
    TicketFilter {
        farm: args.farm,
        season: args.season,
        query: args.query,
    }
}

fn cmd_config(
    show: bool,
    set_tenant: Option<String>,
    set_data_dir: Option<String>,
    set_output: Option<OutputFormat>,
    set_bag_weight: Option<String>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(tenant) = set_tenant {
        config.set("tenant", &tenant)?;
        modified = true;
    }

    if let Some(dir) = set_data_dir {
        config.set("data_dir", &dir)?;
        modified = true;
    }

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if let Some(bag_weight) = set_bag_weight {
        config.set("bag_weight_kg", &bag_weight)?;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}
