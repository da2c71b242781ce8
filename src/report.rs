//! Occupant report and yard summary
//!
//! Plain-data views of a yard for the occupants table and the status line.

use crate::labels::compare_labels;
use crate::model::{format_feet, Container, CustomValue, FieldType, Yard};

/// Shown in place of an empty cell
pub const EMPTY_CELL: &str = "—";

/// Fixed leading columns of the occupant table
pub const BASE_COLUMNS: [&str; 9] = [
    "Container",
    "Size",
    "Renter",
    "Phone",
    "Email",
    "Address",
    "Start date",
    "Monthly rate",
    "Occupied",
];

/// One row of the occupant table, already formatted for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupantRow {
    pub container_id: String,
    pub label: String,
    pub size: String,
    pub renter: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub start_date: String,
    pub monthly_rate: String,
    pub occupied: String,
    /// One cell per custom field, in field order
    pub custom: Vec<String>,
}

impl OccupantRow {
    pub fn cells(&self) -> Vec<&str> {
        let mut cells = vec![
            self.label.as_str(),
            self.size.as_str(),
            self.renter.as_str(),
            self.phone.as_str(),
            self.email.as_str(),
            self.address.as_str(),
            self.start_date.as_str(),
            self.monthly_rate.as_str(),
            self.occupied.as_str(),
        ];
        cells.extend(self.custom.iter().map(String::as_str));
        cells
    }
}

fn or_dash(value: &str) -> String {
    if value.is_empty() {
        EMPTY_CELL.to_string()
    } else {
        value.to_string()
    }
}

fn yes_no(flag: bool) -> String {
    let text = if flag { "Yes" } else { "No" };
    text.to_string()
}

/// Numeric value of a stored rate string, if it has one
pub fn parse_rate(rate: &str) -> Option<f64> {
    let trimmed = rate.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Format an amount as US dollars: `$1,234.50`
pub fn format_usd(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

fn custom_cell(kind: FieldType, value: Option<&CustomValue>) -> String {
    match (kind, value) {
        (FieldType::Boolean, Some(CustomValue::Flag(flag))) => yes_no(*flag),
        (FieldType::Boolean, Some(CustomValue::Text(text))) => yes_no(!text.is_empty()),
        (FieldType::Boolean, None) => yes_no(false),
        (FieldType::Text, Some(CustomValue::Text(text))) => or_dash(text),
        (FieldType::Text, Some(CustomValue::Flag(true))) => "true".to_string(),
        (FieldType::Text, _) => EMPTY_CELL.to_string(),
    }
}

fn occupant_row(yard: &Yard, container: &Container) -> OccupantRow {
    OccupantRow {
        container_id: container.id.clone(),
        label: container.display_label(),
        size: format!("{} ft", format_feet(container.width_ft)),
        renter: or_dash(&container.renter),
        phone: or_dash(&container.phone),
        email: or_dash(&container.email),
        address: or_dash(&container.address),
        start_date: or_dash(&container.start_date),
        monthly_rate: parse_rate(&container.monthly_rate)
            .map(format_usd)
            .unwrap_or_else(|| EMPTY_CELL.to_string()),
        occupied: yes_no(container.occupied),
        custom: yard
            .custom_fields
            .iter()
            .map(|field| custom_cell(field.kind, container.custom_values.get(&field.id)))
            .collect(),
    }
}

/// Rows for every container across all layers, ordered by label
pub fn occupant_rows(yard: &Yard) -> Vec<OccupantRow> {
    let mut containers: Vec<&Container> = yard.containers().collect();
    containers.sort_by(|a, b| compare_labels(&a.display_label(), &b.display_label()));
    containers
        .into_iter()
        .map(|container| occupant_row(yard, container))
        .collect()
}

/// Column headers: the fixed columns then one per custom field
pub fn occupant_headers(yard: &Yard) -> Vec<String> {
    BASE_COLUMNS
        .iter()
        .map(|column| column.to_string())
        .chain(yard.custom_fields.iter().map(|field| field.label.clone()))
        .collect()
}

/// Render the occupant table as aligned plain text
pub fn render_occupant_table(yard: &Yard) -> String {
    let headers = occupant_headers(yard);
    let rows = occupant_rows(yard);
    if rows.is_empty() {
        return "No containers yet.\n".to_string();
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut push_line = |cells: Vec<&str>| {
        let line = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let pad = width - cell.chars().count();
                format!("{}{}", cell, " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    };
    push_line(headers.iter().map(String::as_str).collect());
    for row in &rows {
        push_line(row.cells());
    }
    out
}

/// Sum of numeric monthly rates over occupied containers
pub fn billing_total(yard: &Yard) -> f64 {
    yard.containers()
        .filter(|container| container.occupied)
        .filter_map(|container| parse_rate(&container.monthly_rate))
        .sum()
}

/// One-line status: name, dimensions, active layer and container counts
pub fn yard_summary(yard: &Yard) -> String {
    let dims = format!(
        "{} × {} {}",
        format_feet(yard.width),
        format_feet(yard.height),
        yard.unit
    );
    let layer = match yard.active_layer() {
        Some(layer) => {
            let count = layer.containers.len();
            format!(
                "{} • {} container{}",
                layer.name,
                count,
                if count == 1 { "" } else { "s" }
            )
        }
        None => "No active layer".to_string(),
    };
    format!(
        "{} • {} • {} • {} total",
        yard.name,
        dims,
        layer,
        yard.containers().count()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_container_types;
    use crate::geometry::Point;
    use crate::model::ContainerType;
    use crate::placement::PlacementOptions;
    use crate::store::ContainerPatch;
    use crate::units::Unit;

    fn sample() -> Yard {
        let mut yard = Yard::new("Depot", 100.5, 60.0, Unit::Ft, &default_container_types()).unwrap();
        let layer = yard.layers[0].id.clone();
        let kind = ContainerType::new("20ft", 20.0);
        let mut ids = vec![];
        for x in [0.0, 25.0, 50.0] {
            let c = yard
                .place_new_container(&kind, &layer, Point::new(x, 0.0), PlacementOptions::default())
                .unwrap();
            ids.push(c.id);
        }
        yard.update_details(
            &ids[0],
            ContainerPatch {
                label: Some("10".to_string()),
                renter: Some("Ada".to_string()),
                monthly_rate: Some("1250.5".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        yard.set_occupied(&ids[0], true).unwrap();
        yard.update_details(
            &ids[1],
            ContainerPatch {
                monthly_rate: Some("80".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        yard.update_details(
            &ids[2],
            ContainerPatch {
                label: Some("Office".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        yard
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(95.0), "$95.00");
        assert_eq!(format_usd(1250.5), "$1,250.50");
        assert_eq!(format_usd(1234567.891), "$1,234,567.89");
        assert_eq!(format_usd(-5.0), "-$5.00");
    }

    #[test]
    fn test_rows_sorted_numerically() {
        let rows = occupant_rows(&sample());
        let labels: Vec<_> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["2", "10", "Office"]);
        assert_eq!(rows[1].monthly_rate, "$1,250.50");
        assert_eq!(rows[1].occupied, "Yes");
        assert_eq!(rows[2].renter, EMPTY_CELL);
    }

    #[test]
    fn test_billing_total_counts_occupied_only() {
        assert_eq!(billing_total(&sample()), 1250.5);
    }

    #[test]
    fn test_summary() {
        assert_eq!(
            yard_summary(&sample()),
            "Depot • 100.5 × 60 ft • Ground Level • 3 containers • 3 total"
        );
    }

    #[test]
    fn test_table_snapshot() {
        let mut yard = sample();
        yard.add_field("Power", FieldType::Boolean).unwrap();
        insta::assert_snapshot!(render_occupant_table(&yard).trim_end(), @r###"
        Container  Size   Renter  Phone  Email  Address  Start date  Monthly rate  Occupied  Power
        2          20 ft  —       —      —      —        —           $80.00        No        No
        10         20 ft  Ada     —      —      —        —           $1,250.50     Yes       No
        Office     20 ft  —       —      —      —        —           —             No        No
        "###);
    }
}
