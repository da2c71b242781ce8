//! Schema upgrader for persisted yards.
//!
//! Accepts any JSON produced by any earlier version of the editor and
//! returns a canonical [`Yard`], or a [`ValidationError`] when the record is
//! beyond repair. Malformed nested entries are dropped rather than reported.
//!
//! ## Schema history handled here
//!
//! - Pre-layer saves keep containers in a flat `containers` array; they
//!   become a single "Ground Level" layer.
//! - A save caught half-way through that migration has both; flat
//!   containers missing from every layer are appended to the first layer.
//! - Containers once stored their width as `width` instead of `widthFt`.
//! - `occupied` did not exist; a non-empty renter implied occupancy.

use std::collections::{BTreeMap, HashSet};

use log::warn;
use serde_json::{Map, Value};

use crate::model::{
    format_feet, generate_id, Container, ContainerType, CustomFieldDef, CustomValue, Door, Edge,
    FieldType, Layer, Rotation, Yard, GROUND_LEVEL, UNTITLED_YARD,
};
use crate::geometry::door::clamp_offset;
use crate::units::Unit;

use super::coerce;
use super::error::ValidationError;

/// Width assumed for containers whose stored width is unusable
pub const DEFAULT_WIDTH_FT: f64 = 10.0;

/// Round to the three-decimal precision stored for yard dimensions
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Upgrade every record of a stored collection, silently skipping the
/// records that cannot be recovered. A non-array yields an empty list.
pub fn upgrade_yards(raw: &Value, catalog: &[ContainerType]) -> Vec<Yard> {
    let Some(records) = raw.as_array() else {
        warn!("stored yard collection is not an array; ignoring it");
        return Vec::new();
    };
    records
        .iter()
        .filter_map(|record| match upgrade_yard(record, catalog) {
            Ok(yard) => Some(yard),
            Err(err) => {
                warn!("dropping stored yard: {}", err);
                None
            }
        })
        .collect()
}

/// Upgrade one yard record
pub fn upgrade_yard(raw: &Value, catalog: &[ContainerType]) -> Result<Yard, ValidationError> {
    let record = raw.as_object().ok_or(ValidationError::NotAnObject)?;

    let width = coerce::positive_number(record.get("width")).map(round3);
    let height = coerce::positive_number(record.get("height")).map(round3);
    let (width, height) = match (width, height) {
        (Some(w), Some(h)) if w > 0.0 && h > 0.0 => (w, h),
        _ => {
            let id = coerce::identifier(record.get("id")).unwrap_or_default();
            return Err(ValidationError::invalid_dimensions(id, width, height));
        }
    };

    let unit = record
        .get("unit")
        .and_then(Value::as_str)
        .and_then(Unit::parse)
        .unwrap_or_default();
    let name = coerce::trimmed_text(record.get("name")).unwrap_or_else(|| UNTITLED_YARD.to_string());

    let legacy = upgrade_containers(record.get("containers"));
    let mut layers: Vec<Layer> = record
        .get("layers")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .enumerate()
                .filter_map(|(position, entry)| upgrade_layer(entry, position))
                .collect()
        })
        .unwrap_or_default();

    if layers.is_empty() {
        layers.push(Layer {
            id: generate_id(),
            name: GROUND_LEVEL.to_string(),
            containers: legacy,
        });
    } else if !legacy.is_empty() {
        merge_legacy_containers(&mut layers, legacy);
    }

    let active_layer_id = record
        .get("activeLayerId")
        .and_then(Value::as_str)
        .filter(|id| layers.iter().any(|layer| layer.id == *id))
        .map(str::to_string)
        .unwrap_or_else(|| layers[0].id.clone());

    let mut yard = Yard {
        id: coerce::identifier(record.get("id")).unwrap_or_else(generate_id),
        name,
        width,
        height,
        unit,
        layers,
        active_layer_id,
        default_rates: sanitize_default_rates(record.get("defaultRates"), catalog),
        custom_fields: sanitize_custom_fields(record.get("customFields")),
        next_container_number: 1,
    };
    yard.reconcile_custom_values();
    yard.refresh_next_container_number();
    Ok(yard)
}

fn merge_legacy_containers(layers: &mut [Layer], legacy: Vec<Container>) {
    let mut seen: HashSet<String> = layers
        .iter()
        .flat_map(|layer| layer.containers.iter().map(|c| c.id.clone()))
        .collect();
    for container in legacy {
        if seen.insert(container.id.clone()) {
            layers[0].containers.push(container);
        }
    }
}

/// A non-object entry is dropped; its position still counts for numbering
fn upgrade_layer(raw: &Value, position: usize) -> Option<Layer> {
    let Some(record) = raw.as_object() else {
        warn!("dropping stored layer {}: not an object", position + 1);
        return None;
    };
    Some(Layer {
        id: coerce::identifier(record.get("id")).unwrap_or_else(generate_id),
        name: coerce::trimmed_text(record.get("name"))
            .unwrap_or_else(|| format!("Layer {}", position + 1)),
        containers: upgrade_containers(record.get("containers")),
    })
}

fn upgrade_containers(raw: Option<&Value>) -> Vec<Container> {
    raw.and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(upgrade_container).collect())
        .unwrap_or_default()
}

/// Upgrade one container record; non-objects are dropped
pub fn upgrade_container(raw: &Value) -> Option<Container> {
    let record = raw.as_object()?;

    let width_ft = coerce::number(record.get("widthFt"))
        .filter(|w| *w > 0.0)
        .or_else(|| coerce::number(record.get("width")).filter(|w| *w > 0.0))
        .unwrap_or(DEFAULT_WIDTH_FT);
    let text = |key: &str| coerce::truthy_text(record.get(key)).unwrap_or_default();
    let renter = text("renter");
    let occupied = coerce::flag(record.get("occupied")).unwrap_or(!renter.trim().is_empty());

    Some(Container {
        id: coerce::identifier(record.get("id")).unwrap_or_else(generate_id),
        kind: coerce::truthy_text(record.get("type"))
            .unwrap_or_else(|| format!("{}ft", format_feet(width_ft))),
        width_ft,
        x: coerce::strict_number(record.get("x")).unwrap_or(0.0),
        y: coerce::strict_number(record.get("y")).unwrap_or(0.0),
        rotation: coerce::strict_number(record.get("rotation"))
            .map(Rotation::from_degrees)
            .unwrap_or_default(),
        label: coerce::trimmed_text(record.get("label")).unwrap_or_else(|| format_feet(width_ft)),
        monthly_rate: text("monthlyRate"),
        phone: text("phone"),
        email: text("email"),
        address: text("address"),
        start_date: coerce::trimmed_text(record.get("startDate")).unwrap_or_default(),
        renter,
        occupied,
        doors: sanitize_doors(record.get("doors")),
        custom_values: sanitize_custom_values(record.get("customValues")),
    })
}

/// Keep door objects, defaulting bad edges to north and bad offsets to 0.5
pub fn sanitize_doors(raw: Option<&Value>) -> Vec<Door> {
    let Some(entries) = raw.and_then(Value::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(Value::as_object)
        .map(|door| Door {
            id: coerce::identifier(door.get("id")).unwrap_or_else(generate_id),
            edge: door
                .get("edge")
                .and_then(Value::as_str)
                .and_then(Edge::parse)
                .unwrap_or_default(),
            offset: clamp_offset(coerce::number(door.get("offset")).unwrap_or(f64::NAN)),
        })
        .collect()
}

/// One rate per catalog key; stored non-empty values win, unknown keys go
pub fn sanitize_default_rates(
    raw: Option<&Value>,
    catalog: &[ContainerType],
) -> BTreeMap<String, String> {
    let stored = raw.and_then(Value::as_object);
    catalog
        .iter()
        .map(|kind| {
            let rate = stored
                .and_then(|rates| rates.get(&kind.key))
                .and_then(rate_text)
                .unwrap_or_default();
            (kind.key.clone(), rate)
        })
        .collect()
}

fn rate_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(coerce::number_text(n)),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Keep field definitions with a non-blank label
pub fn sanitize_custom_fields(raw: Option<&Value>) -> Vec<CustomFieldDef> {
    let Some(entries) = raw.and_then(Value::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|field| {
            let label = coerce::trimmed_text(field.get("label"))?;
            let kind = match field.get("type").and_then(Value::as_str) {
                Some("boolean") => FieldType::Boolean,
                _ => FieldType::Text,
            };
            Some(CustomFieldDef {
                id: coerce::identifier(field.get("id")).unwrap_or_else(generate_id),
                label,
                kind,
            })
        })
        .collect()
}

fn sanitize_custom_values(raw: Option<&Value>) -> BTreeMap<String, CustomValue> {
    let Some(values) = raw.and_then(Value::as_object) else {
        return BTreeMap::new();
    };
    scalar_values(values)
}

fn scalar_values(values: &Map<String, Value>) -> BTreeMap<String, CustomValue> {
    values
        .iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::Bool(b) => CustomValue::Flag(*b),
                Value::String(s) => CustomValue::Text(s.clone()),
                _ => return None,
            };
            Some((key.clone(), value))
        })
        .collect()
}
