//! Harvest and quality summary over settled tickets

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::{format_2dp, WeighingTicket};

/// Selection of tickets for listings and reports
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFilter {
    pub farm: Option<String>,
    pub season: Option<String>,
    /// Free text matched against ticket number, driver, and plate
    pub query: Option<String>,
}

impl TicketFilter {
    pub fn matches(&self, ticket: &WeighingTicket) -> bool {
        if let Some(ref farm) = self.farm {
            if ticket.farm != *farm {
                return false;
            }
        }
        if let Some(ref season) = self.season {
            if ticket.season() != Some(season.as_str()) {
                return false;
            }
        }
        match self.query {
            Some(ref q) => ticket.matches_query(q),
            None => true,
        }
    }

    /// Matching tickets, newest first
    pub fn apply<'a>(&self, tickets: &'a [WeighingTicket]) -> Vec<&'a WeighingTicket> {
        let mut selected: Vec<_> = tickets.iter().filter(|t| self.matches(t)).collect();
        selected.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.ticket_number.cmp(&b.ticket_number)));
        selected
    }
}

/// Delivered weight of one production cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantingTotal {
    pub planting_id: String,
    pub crop: String,
    pub season: Option<String>,
    pub ticket_count: usize,
    pub net_weight_kg: Decimal,
    pub bags: Decimal,
}

/// Totals of a harvest (relatório de colheita)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestSummary {
    pub ticket_count: usize,
    pub total_net_kg: Decimal,
    pub total_shrinkage_kg: Decimal,
    pub total_deductions_kg: Decimal,
    pub average_moisture_pct: Option<Decimal>,
    pub average_impurity_pct: Option<Decimal>,
    pub bags: Decimal,
    pub by_planting: Vec<PlantingTotal>,
}

pub fn summarize_harvest(tickets: &[&WeighingTicket], bag_weight_kg: Decimal) -> HarvestSummary {
    let to_bags = |kg: Decimal| {
        if bag_weight_kg.is_zero() {
            Decimal::ZERO
        } else {
            kg / bag_weight_kg
        }
    };

    let total_net_kg: Decimal = tickets.iter().map(|t| t.settlement.net_weight_kg).sum();
    let total_shrinkage_kg = tickets.iter().map(|t| t.settlement.shrinkage_kg).sum();
    let total_deductions_kg = tickets.iter().map(|t| t.settlement.total_deductions_kg).sum();

    let mut by_planting: Vec<PlantingTotal> = Vec::new();
    for ticket in tickets {
        let Some(ref planting) = ticket.planting else {
            continue;
        };
        let net = ticket.settlement.net_weight_kg;
        match by_planting.iter_mut().find(|p| p.planting_id == planting.id) {
            Some(entry) => {
                entry.ticket_count += 1;
                entry.net_weight_kg += net;
            }
            None => by_planting.push(PlantingTotal {
                planting_id: planting.id.clone(),
                crop: planting.crop.clone(),
                season: planting.season.clone(),
                ticket_count: 1,
                net_weight_kg: net,
                bags: Decimal::ZERO,
            }),
        }
    }
    for entry in &mut by_planting {
        entry.bags = to_bags(entry.net_weight_kg);
    }
    by_planting.sort_by(|a, b| b.net_weight_kg.cmp(&a.net_weight_kg));

    HarvestSummary {
        ticket_count: tickets.len(),
        total_net_kg,
        total_shrinkage_kg,
        total_deductions_kg,
        average_moisture_pct: mean(tickets.iter().map(|t| t.measurements.moisture_pct)),
        average_impurity_pct: mean(tickets.iter().map(|t| t.measurements.impurity_pct)),
        bags: to_bags(total_net_kg),
        by_planting,
    }
}

fn mean(values: impl Iterator<Item = Decimal>) -> Option<Decimal> {
    let (sum, count) = values.fold((Decimal::ZERO, 0u64), |(sum, n), v| (sum + v, n + 1));
    if count == 0 {
        None
    } else {
        Some(sum / Decimal::from(count))
    }
}

pub fn generate_harvest_report(summary: &HarvestSummary) -> String {
    let mut report = String::new();
    report.push_str("==================================================\n");
    report.push_str("              Relatório de Colheita               \n");
    report.push_str("                 Harvest Report                   \n");
    report.push_str("==================================================\n\n");
    report.push_str("【Resumo / Summary】\n");
    report.push_str(&format!("  Romaneios / Tickets:          {}\n", summary.ticket_count));
    report.push_str(&format!("  Peso líquido / Net (kg):      {}\n", format_2dp(summary.total_net_kg)));
    report.push_str(&format!("  Sacas / Bags:                 {}\n", format_2dp(summary.bags)));
    report.push_str(&format!("  Descontos / Deductions (kg):  {}\n", format_2dp(summary.total_deductions_kg)));
    report.push_str(&format!("  Quebra técnica / Shrink (kg): {}\n", format_2dp(summary.total_shrinkage_kg)));
    if let Some(m) = summary.average_moisture_pct {
        report.push_str(&format!("  Umidade média / Moisture:     {}%\n", format_2dp(m)));
    }
    if let Some(i) = summary.average_impurity_pct {
        report.push_str(&format!("  Impureza média / Impurity:    {}%\n", format_2dp(i)));
    }
    report.push('\n');

    if !summary.by_planting.is_empty() {
        report.push_str("【Por plantio / By planting】\n");
        report.push_str("-".repeat(70).as_str());
        report.push('\n');
        report.push_str(&format!(
            "{:<16} {:<12} {:<8} {:>8} {:>12} {:>10}\n",
            "Plantio", "Cultura", "Safra", "Tickets", "Líquido kg", "Sacas"
        ));
        report.push_str("-".repeat(70).as_str());
        report.push('\n');
        for p in &summary.by_planting {
            report.push_str(&format!(
                "{:<16} {:<12} {:<8} {:>8} {:>12} {:>10}\n",
                truncate(&p.planting_id, 15),
                truncate(&p.crop, 11),
                truncate(p.season.as_deref().unwrap_or("-"), 7),
                p.ticket_count,
                format_2dp(p.net_weight_kg),
                format_2dp(p.bags),
            ));
        }
    }

    report
}

/// Fit `s` into a table column of `max_chars`, marking cuts with `...`
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ManualOverrides, PlantingRef, Settlement, TicketMeasurements};
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ticket(number: &str, day: u32, farm: &str, planting: Option<(&str, &str)>, net: &str, moisture: &str) -> WeighingTicket {
        WeighingTicket {
            id: format!("id-{number}"),
            tenant: "acme".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            ticket_number: number.to_string(),
            farm: farm.to_string(),
            field: "T1".to_string(),
            planting: planting.map(|(id, season)| PlantingRef {
                id: id.to_string(),
                crop: "Soja".to_string(),
                season: Some(season.to_string()),
            }),
            driver: Some("Carlos".to_string()),
            plate: Some("QWE4R56".to_string()),
            measurements: TicketMeasurements {
                gross_weight_kg: d("10000"),
                tare_weight_kg: d("2000"),
                moisture_pct: d(moisture),
                impurity_pct: d("1"),
                damage_pct: Decimal::ZERO,
            },
            overrides: ManualOverrides::default(),
            warehouse_id: None,
            settlement: Settlement {
                load_weight_kg: d("8000"),
                total_deductions_kg: d("8000") - d(net),
                net_weight_kg: d(net),
                ..Default::default()
            },
        }
    }

    fn tickets() -> Vec<WeighingTicket> {
        vec![
            ticket("001", 1, "Santa Rita", Some(("p-soja", "24/25")), "7680", "18"),
            ticket("002", 3, "Santa Rita", Some(("p-soja", "24/25")), "7920", "15"),
            ticket("003", 2, "Boa Vista", Some(("p-milho", "23/24")), "6000", "13"),
            ticket("004", 4, "Boa Vista", None, "3000", "14"),
        ]
    }

    #[test]
    fn test_filter_by_farm_sorted_newest_first() {
        let all = tickets();
        let filter = TicketFilter {
            farm: Some("Santa Rita".to_string()),
            ..Default::default()
        };
        let selected = filter.apply(&all);
        let numbers: Vec<_> = selected.iter().map(|t| t.ticket_number.as_str()).collect();
        assert_eq!(numbers, vec!["002", "001"]);
    }

    #[test]
    fn test_filter_by_season_and_query() {
        let all = tickets();
        let by_season = TicketFilter {
            season: Some("23/24".to_string()),
            ..Default::default()
        };
        assert_eq!(by_season.apply(&all).len(), 1);

        let by_query = TicketFilter {
            query: Some("004".to_string()),
            ..Default::default()
        };
        assert_eq!(by_query.apply(&all)[0].ticket_number, "004");
    }

    #[test]
    fn test_summarize_harvest() {
        let all = tickets();
        let selected = TicketFilter::default().apply(&all);
        let summary = summarize_harvest(&selected, d("60"));

        assert_eq!(summary.ticket_count, 4);
        assert_eq!(summary.total_net_kg, d("24600"));
        assert_eq!(summary.bags, d("410"));
        assert_eq!(summary.total_deductions_kg, d("7400"));
        assert_eq!(summary.average_moisture_pct, Some(d("15")));
        assert_eq!(summary.average_impurity_pct, Some(d("1")));

        assert_eq!(summary.by_planting.len(), 2);
        assert_eq!(summary.by_planting[0].planting_id, "p-soja");
        assert_eq!(summary.by_planting[0].ticket_count, 2);
        assert_eq!(summary.by_planting[0].net_weight_kg, d("15600"));
        assert_eq!(summary.by_planting[0].bags, d("260"));
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize_harvest(&[], d("60"));
        assert_eq!(summary.ticket_count, 0);
        assert!(summary.total_net_kg.is_zero());
        assert_eq!(summary.average_moisture_pct, None);
        assert!(summary.by_planting.is_empty());
    }

    #[test]
    fn test_generate_report() {
        let all = tickets();
        let selected = TicketFilter::default().apply(&all);
        let report = generate_harvest_report(&summarize_harvest(&selected, d("60")));
        assert!(report.contains("Harvest Report"));
        assert!(report.contains("24600"));
        assert!(report.contains("p-soja"));
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("Soja", 11), "Soja");
        assert_eq!(truncate("Feijão carioca", 10), "Feijão ...");
        assert_eq!(truncate("abcd", 2), "...");
    }
}
