//! Integration tests for upgrading persisted yards.
//!
//! These tests verify that:
//! - Pre-layer saves become a single "Ground Level" layer
//! - Half-migrated saves keep every container exactly once
//! - Loose scalars are coerced to the canonical model
//! - Upgrading a canonical yard changes nothing

use pretty_assertions::assert_eq;
use serde_json::json;

use yard_planner::{
    upgrade_yard, upgrade_yards, CustomValue, EditorConfig, Edge, FieldType, Rotation, Unit,
    ValidationError,
};

fn catalog() -> Vec<yard_planner::ContainerType> {
    EditorConfig::default().container_types
}

#[test]
fn test_flat_containers_become_ground_level() {
    let yard = upgrade_yard(
        &json!({
            "id": "y1",
            "name": " Old Lot ",
            "width": 100,
            "height": "60",
            "unit": "m",
            "containers": [
                {"id": "c1", "width": "20", "x": 0, "y": 0, "label": "1", "renter": "Ada"},
                {"id": "c2", "widthFt": 10, "x": 30, "y": 0, "rotation": "90"},
                "not a container"
            ]
        }),
        &catalog(),
    )
    .unwrap();

    assert_eq!(yard.id, "y1");
    assert_eq!(yard.name, "Old Lot");
    assert_eq!((yard.width, yard.height, yard.unit), (100.0, 60.0, Unit::M));
    assert_eq!(yard.layers.len(), 1);
    assert_eq!(yard.layers[0].name, "Ground Level");
    assert_eq!(yard.active_layer_id, yard.layers[0].id);

    let c1 = yard.container("c1").unwrap();
    assert_eq!(c1.width_ft, 20.0);
    assert!(c1.occupied);
    let c2 = yard.container("c2").unwrap();
    assert_eq!(c2.rotation, Rotation::Deg0);
    assert_eq!(c2.label, "10");
    assert!(!c2.occupied);

    assert_eq!(yard.next_container_number, 2);
}

#[test]
fn test_half_migrated_save_merges_without_duplicates() {
    let yard = upgrade_yard(
        &json!({
            "width": 80,
            "height": 40,
            "layers": [
                {"id": "base", "name": "Base", "containers": [{"id": "c1", "label": "1"}]},
                {"id": "deck", "containers": []}
            ],
            "activeLayerId": "deck",
            "containers": [{"id": "c1", "label": "1"}, {"id": "c9", "label": "9"}]
        }),
        &catalog(),
    )
    .unwrap();

    let base: Vec<_> = yard.layers[0].containers.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(base, vec!["c1", "c9"]);
    assert_eq!(yard.layers[1].name, "Layer 2");
    assert_eq!(yard.active_layer_id, "deck");
}

#[test]
fn test_unrecoverable_yards_are_dropped() {
    let raw = json!([
        {"id": "ok", "width": 10, "height": 10},
        {"id": "flat", "width": 10, "height": 0},
        {"id": "nan", "width": "wide", "height": 10},
        null,
        42
    ]);
    let yards = upgrade_yards(&raw, &catalog());
    let ids: Vec<_> = yards.iter().map(|y| y.id.as_str()).collect();
    assert_eq!(ids, vec!["ok"]);

    assert_eq!(
        upgrade_yard(&json!({"id": "flat", "width": 10, "height": -1}), &catalog()),
        Err(ValidationError::invalid_dimensions("flat", Some(10.0), None))
    );
}

#[test]
fn test_rates_and_fields_are_sanitized() {
    let yard = upgrade_yard(
        &json!({
            "width": 50,
            "height": 50,
            "defaultRates": {"20ft": "95", "40ft": 150, "8ft": "", "99ft": "1"},
            "customFields": [
                {"id": "gate", "label": "Gate code"},
                {"id": "power", "label": "Power", "type": "boolean"},
                {"label": ""},
                "junk"
            ],
            "containers": [
                {"id": "c1", "customValues": {"gate": false, "power": "on", "stale": "x", "n": 3}}
            ]
        }),
        &catalog(),
    )
    .unwrap();

    let keys: Vec<_> = yard.default_rates.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["10ft", "20ft", "40ft", "45ft", "8ft"]);
    assert_eq!(yard.default_rates["20ft"], "95");
    assert_eq!(yard.default_rates["40ft"], "150");
    assert_eq!(yard.default_rates["8ft"], "");

    assert_eq!(yard.custom_fields.len(), 2);
    assert_eq!(yard.custom_fields[0].kind, FieldType::Text);
    assert_eq!(yard.custom_fields[1].kind, FieldType::Boolean);

    let values = &yard.container("c1").unwrap().custom_values;
    assert_eq!(values.len(), 2);
    assert_eq!(values["gate"], CustomValue::Text("false".to_string()));
    assert_eq!(values["power"], CustomValue::Flag(true));
}

#[test]
fn test_doors_are_sanitized() {
    let yard = upgrade_yard(
        &json!({
            "width": 50,
            "height": 50,
            "containers": [{
                "id": "c1",
                "doors": [
                    {"id": "d1", "edge": "west", "offset": "0.25"},
                    {"edge": "diagonal", "offset": -3},
                    {"id": "d3"}
                ]
            }]
        }),
        &catalog(),
    )
    .unwrap();

    let doors = &yard.container("c1").unwrap().doors;
    assert_eq!(doors.len(), 3);
    assert_eq!((doors[0].edge, doors[0].offset), (Edge::West, 0.25));
    assert_eq!((doors[1].edge, doors[1].offset), (Edge::North, 0.0));
    assert_eq!((doors[2].edge, doors[2].offset), (Edge::North, 0.5));
}

#[test]
fn test_upgrade_is_idempotent() {
    let first = upgrade_yard(
        &json!({
            "name": "Round trip",
            "width": 120.12345,
            "height": 80,
            "unit": "cm",
            "customFields": [{"label": "Notes"}, {"label": "Alarm", "type": "boolean"}],
            "layers": [
                {"name": "Ground", "containers": [
                    {"type": "20ft", "widthFt": 20, "x": 0, "y": 0, "label": " 3 ",
                     "renter": "Ada", "monthlyRate": 99, "startDate": " 2024-01-01 ",
                     "doors": [{"edge": "south", "offset": 0.75}]},
                    {"type": "10ft", "widthFt": 10, "x": 50, "y": 0, "rotation": 90,
                     "occupied": false, "customValues": {"unknown": true}}
                ]},
                {"containers": [{"widthFt": 45, "x": 0, "y": 0}]}
            ]
        }),
        &catalog(),
    )
    .unwrap();

    let stored = serde_json::to_value(&first).unwrap();
    let second = upgrade_yard(&stored, &catalog()).unwrap();
    assert_eq!(second, first);

    assert_eq!(first.width, 120.123);
    let ground = &first.layers[0].containers;
    assert_eq!(ground[0].label, "3");
    assert_eq!(ground[0].monthly_rate, "99");
    assert_eq!(ground[0].start_date, "2024-01-01");
    assert_eq!(ground[1].rotation, Rotation::Deg90);
    assert_eq!(first.layers[1].name, "Layer 2");
    assert_eq!(first.layers[1].containers[0].kind, "45ft");
    assert_eq!(first.next_container_number, 1);
}

#[test]
fn test_canonical_json_shape() {
    let yard = upgrade_yard(
        &json!({"id": "y", "width": 10, "height": 10, "layers": [{"id": "l", "name": "L"}]}),
        &catalog(),
    )
    .unwrap();
    let value = serde_json::to_value(&yard).unwrap();
    assert_eq!(value["activeLayerId"], json!("l"));
    assert_eq!(value["unit"], json!("ft"));
    assert_eq!(value["nextContainerNumber"], json!(1));
    assert_eq!(value["layers"][0]["containers"], json!([]));
}
