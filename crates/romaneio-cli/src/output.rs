//! Output formatting module

use rust_decimal::Decimal;
use serde::Serialize;

use romaneio_domain::model::{format_2dp, ClassificationStandard, Settlement, WarehouseRate, WeighingTicket};
use romaneio_domain::service::{generate_harvest_report, truncate, HarvestSummary};
use romaneio_types::{OutputFormat, Result};

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    println!("{}", content);
    Ok(())
}

fn render_settlement(settlement: &Settlement) -> String {
    let s = settlement.rounded(2);
    let mut out = String::new();
    out.push_str(&format!("Load:            {:>12} kg\n", s.load_weight_kg));
    out.push_str(&format!("Moisture:        {:>12} kg\n", s.moisture_deduction_kg));
    out.push_str(&format!("Impurity:        {:>12} kg\n", s.impurity_deduction_kg));
    out.push_str(&format!("Damage:          {:>12} kg\n", s.damage_deduction_kg));
    out.push_str(&format!("Deductions:      {:>12} kg\n", s.total_deductions_kg));
    out.push_str(&format!("Shrinkage:       {:>12} kg\n", s.shrinkage_kg));
    out.push_str("-------------------------------\n");
    out.push_str(&format!("Net weight:      {:>12} kg\n", s.net_weight_kg));
    out
}

pub fn output_settlement(output_format: OutputFormat, settlement: &Settlement) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(settlement);
    }

    println!("\nSettlement");
    println!("==========");
    print!("{}", render_settlement(settlement));
    Ok(())
}

fn render_ticket(ticket: &WeighingTicket, warehouse: Option<&WarehouseRate>, bag_weight_kg: Decimal) -> String {
    let mut out = String::new();
    out.push_str(&format!("\nRomaneio {}\n", ticket.ticket_number));
    out.push_str("===============\n");
    out.push_str(&format!("Id:              {}\n", ticket.id));
    out.push_str(&format!("Date:            {}\n", ticket.date.format("%d/%m/%Y")));
    out.push_str(&format!("Farm / field:    {} / {}\n", ticket.farm, ticket.field));
    if let Some(crop) = ticket.crop() {
        out.push_str(&format!("Planting:        {} {}\n", crop, ticket.season().unwrap_or("")));
    }
    if let Some(ref driver) = ticket.driver {
        out.push_str(&format!("Driver:          {}\n", driver));
    }
    if let Some(ref plate) = ticket.plate {
        out.push_str(&format!("Plate:           {}\n", plate));
    }
    if let Some(rate) = warehouse {
        out.push_str(&format!(
            "Warehouse:       {} ({}% shrinkage)\n",
            rate.supplier, rate.technical_shrinkage_pct
        ));
    }

    let m = &ticket.measurements;
    out.push_str("\n--- Readings ---\n");
    out.push_str(&format!("Gross:           {:>12} kg\n", format_2dp(m.gross_weight_kg)));
    out.push_str(&format!("Tare:            {:>12} kg\n", format_2dp(m.tare_weight_kg)));
    out.push_str(&format!("Moisture:        {:>12} %\n", format_2dp(m.moisture_pct)));
    out.push_str(&format!("Impurity:        {:>12} %\n", format_2dp(m.impurity_pct)));
    out.push_str(&format!("Damage:          {:>12} %\n", format_2dp(m.damage_pct)));
    if !ticket.overrides.is_empty() {
        out.push_str("(manual deductions entered)\n");
    }

    out.push_str("\n--- Settlement ---\n");
    out.push_str(&render_settlement(&ticket.settlement));
    out.push_str(&format!(
        "Classification:  {:>12} kg\n",
        format_2dp(ticket.classification_discount_kg())
    ));
    out.push_str(&format!("Bags:            {:>12}\n", format_2dp(ticket.bags(bag_weight_kg))));
    out
}

pub fn output_ticket(
    output_format: OutputFormat,
    ticket: &WeighingTicket,
    warehouse: Option<&WarehouseRate>,
    bag_weight_kg: Decimal,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(ticket);
    }

    print!("{}", render_ticket(ticket, warehouse, bag_weight_kg));
    Ok(())
}

pub fn output_tickets(output_format: OutputFormat, tickets: &[WeighingTicket], limit: usize) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(tickets);
    }

    println!("Weighing Tickets");
    println!("================");
    println!("Total: {}", tickets.len());
    println!();

    if tickets.is_empty() {
        println!("No tickets found.");
        return Ok(());
    }

    println!(
        "{:<12} {:<10} {:<20} {:<8} {:>12} {:>12}  {}",
        "Ticket", "Date", "Farm", "Field", "Load(kg)", "Net(kg)", "Id"
    );
    println!("{}", "-".repeat(116));

    for ticket in tickets.iter().take(limit) {
        println!(
            "{:<12} {:<10} {:<20} {:<8} {:>12} {:>12}  {}",
            truncate(&ticket.ticket_number, 12),
            ticket.date.format("%d/%m/%y"),
            truncate(&ticket.farm, 20),
            truncate(&ticket.field, 8),
            format_2dp(ticket.settlement.load_weight_kg),
            format_2dp(ticket.settlement.net_weight_kg),
            ticket.id
        );
    }

    if tickets.len() > limit {
        println!();
        println!("... and {} more tickets", tickets.len() - limit);
    }

    Ok(())
}

pub fn output_standards(output_format: OutputFormat, standards: &[ClassificationStandard]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(standards);
    }

    if standards.is_empty() {
        println!("No classification standards registered.");
        return Ok(());
    }

    println!(
        "{:<24} {:<12} {:>9} {:>9} {:>9} {:>9}  {}",
        "Name", "Crop", "Moist.%", "Impur.%", "Damage%", "Fee%", "Id"
    );
    println!("{}", "-".repeat(116));
    for s in standards {
        println!(
            "{:<24} {:<12} {:>9} {:>9} {:>9} {:>9}  {}",
            truncate(&s.name, 24),
            truncate(&s.crop, 12),
            s.standard_moisture_pct,
            s.standard_impurity_pct,
            s.standard_damage_pct,
            s.drying_fee_pct,
            s.id
        );
    }
    Ok(())
}

pub fn output_warehouses(output_format: OutputFormat, rates: &[WarehouseRate]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(rates);
    }

    if rates.is_empty() {
        println!("No warehouse rates registered.");
        return Ok(());
    }

    println!(
        "{:<24} {:>11} {:>10} {:>10} {:<12} {:<5}  {}",
        "Supplier", "Shrinkage%", "Recep./t", "Storage", "Frequency", "Unit", "Id"
    );
    println!("{}", "-".repeat(116));
    for r in rates {
        println!(
            "{:<24} {:>11} {:>10} {:>10} {:<12} {:<5}  {}",
            truncate(&r.supplier, 24),
            r.technical_shrinkage_pct,
            r.reception_fee_per_ton,
            r.storage_fee,
            r.frequency.to_string(),
            r.payment_unit.to_string(),
            r.id
        );
    }
    Ok(())
}

pub fn output_summary(output_format: OutputFormat, summary: &HarvestSummary) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(summary);
    }

    print!("{}", generate_harvest_report(summary));
    Ok(())
}

pub fn output_json<T: Serialize>(value: &T) -> Result<()> {
    print_json(value)
}
