//! Core types for the yard model

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::labels;
use crate::units::Unit;

/// Name given to the layer synthesized for new or layer-less yards
pub const GROUND_LEVEL: &str = "Ground Level";

/// Name given to yards whose persisted name is blank
pub const UNTITLED_YARD: &str = "Untitled Yard";

/// A kind of container offered by the palette
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerType {
    /// Catalog key, e.g. `"20ft"`
    pub key: String,
    /// Nominal long dimension in feet
    pub width_ft: f64,
}

impl ContainerType {
    pub fn new(key: impl Into<String>, width_ft: f64) -> Self {
        Self {
            key: key.into(),
            width_ft,
        }
    }
}

/// Container orientation. Only quarter turns between the two axes exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u16", from = "u16")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
}

impl Rotation {
    /// Coerce a raw angle: exactly 90 is a quarter turn, everything else is 0
    pub fn from_degrees(degrees: f64) -> Self {
        if degrees == 90.0 {
            Rotation::Deg90
        } else {
            Rotation::Deg0
        }
    }

    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
        }
    }

    /// The other orientation
    pub fn toggled(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg0,
        }
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

impl From<u16> for Rotation {
    fn from(degrees: u16) -> Self {
        Rotation::from_degrees(f64::from(degrees))
    }
}

/// Container edge a door sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    #[default]
    North,
    South,
    East,
    West,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::North, Edge::South, Edge::East, Edge::West];

    pub fn as_str(self) -> &'static str {
        match self {
            Edge::North => "north",
            Edge::South => "south",
            Edge::East => "east",
            Edge::West => "west",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|edge| edge.as_str() == tag)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An opening on one edge of a container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub id: String,
    pub edge: Edge,
    /// Relative position along the edge, 0 = start, 1 = end
    pub offset: f64,
}

/// Value type of a user-defined column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Boolean,
}

impl FieldType {
    /// Value a container gets for a field it has never set
    pub fn default_value(self) -> CustomValue {
        match self {
            FieldType::Text => CustomValue::Text(String::new()),
            FieldType::Boolean => CustomValue::Flag(false),
        }
    }
}

/// Definition of a per-yard custom field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomFieldDef {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FieldType,
}

/// A container's value for one custom field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomValue {
    Flag(bool),
    Text(String),
}

impl CustomValue {
    /// Convert to the representation required by `kind`
    pub fn coerce(&self, kind: FieldType) -> CustomValue {
        match (kind, self) {
            (FieldType::Boolean, CustomValue::Flag(flag)) => CustomValue::Flag(*flag),
            (FieldType::Boolean, CustomValue::Text(text)) => CustomValue::Flag(!text.is_empty()),
            (FieldType::Text, CustomValue::Text(text)) => CustomValue::Text(text.clone()),
            (FieldType::Text, CustomValue::Flag(flag)) => CustomValue::Text(flag.to_string()),
        }
    }
}

/// A placed container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub width_ft: f64,
    pub x: f64,
    pub y: f64,
    pub rotation: Rotation,
    pub label: String,
    pub renter: String,
    pub monthly_rate: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub start_date: String,
    pub occupied: bool,
    pub doors: Vec<Door>,
    pub custom_values: BTreeMap<String, CustomValue>,
}

impl Container {
    /// Label to show, falling back to the nominal width
    pub fn display_label(&self) -> String {
        let trimmed = self.label.trim();
        if trimmed.is_empty() {
            format_feet(self.width_ft)
        } else {
            trimmed.to_string()
        }
    }

    /// Clear every occupancy string; used when the occupied flag is cleared
    pub fn clear_occupancy(&mut self) {
        self.renter.clear();
        self.monthly_rate.clear();
        self.phone.clear();
        self.email.clear();
        self.address.clear();
        self.start_date.clear();
    }

    /// Bring `custom_values` in line with `fields`: back-fill missing
    /// entries, coerce mismatched types and prune unknown keys.
    pub fn reconcile_custom_values(&mut self, fields: &[CustomFieldDef]) {
        let mut reconciled = BTreeMap::new();
        for field in fields {
            let value = match self.custom_values.get(&field.id) {
                Some(existing) => existing.coerce(field.kind),
                None => field.kind.default_value(),
            };
            reconciled.insert(field.id.clone(), value);
        }
        self.custom_values = reconciled;
    }
}

/// An independently collision-checked level of a yard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: String,
    pub name: String,
    pub containers: Vec<Container>,
}

impl Layer {
    pub fn container(&self, id: &str) -> Option<&Container> {
        self.containers.iter().find(|c| c.id == id)
    }

    pub fn container_mut(&mut self, id: &str) -> Option<&mut Container> {
        self.containers.iter_mut().find(|c| c.id == id)
    }
}

/// Position of a container inside a yard's layer list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerLocation {
    pub layer: usize,
    pub index: usize,
}

/// A bounded rectangular yard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Yard {
    pub id: String,
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub unit: Unit,
    /// Insertion order is z-order: later layers stack above earlier ones
    pub layers: Vec<Layer>,
    pub active_layer_id: String,
    pub default_rates: BTreeMap<String, String>,
    pub custom_fields: Vec<CustomFieldDef>,
    /// Cached preview of the next numeric label; recomputed before use
    pub next_container_number: u64,
}

impl Yard {
    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    pub fn layer_mut(&mut self, id: &str) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|layer| layer.id == id)
    }

    pub fn layer_index(&self, id: &str) -> Option<usize> {
        self.layers.iter().position(|layer| layer.id == id)
    }

    /// Active layer, falling back to the first layer when the id is stale
    pub fn active_layer(&self) -> Option<&Layer> {
        self.layer(&self.active_layer_id).or_else(|| self.layers.first())
    }

    /// Reset a stale `active_layer_id` to the first layer
    pub fn ensure_active_layer(&mut self) {
        if self.layer(&self.active_layer_id).is_none() {
            if let Some(first) = self.layers.first() {
                self.active_layer_id = first.id.clone();
            }
        }
    }

    /// Layers drawn underneath `layer_id` as onion skin
    pub fn layers_below(&self, layer_id: &str) -> &[Layer] {
        match self.layer_index(layer_id) {
            Some(index) => &self.layers[..index],
            None => &[],
        }
    }

    /// Every container across all layers, in layer order
    pub fn containers(&self) -> impl Iterator<Item = &Container> {
        self.layers.iter().flat_map(|layer| layer.containers.iter())
    }

    pub fn locate(&self, container_id: &str) -> Option<ContainerLocation> {
        self.layers.iter().enumerate().find_map(|(layer, l)| {
            l.containers
                .iter()
                .position(|c| c.id == container_id)
                .map(|index| ContainerLocation { layer, index })
        })
    }

    pub fn container(&self, id: &str) -> Option<&Container> {
        self.containers().find(|c| c.id == id)
    }

    pub fn container_mut(&mut self, id: &str) -> Option<&mut Container> {
        self.layers
            .iter_mut()
            .flat_map(|layer| layer.containers.iter_mut())
            .find(|c| c.id == id)
    }

    /// Recompute and cache the smallest free numeric label
    pub fn refresh_next_container_number(&mut self) -> u64 {
        let next = labels::smallest_available_numeric_label(self.containers());
        self.next_container_number = next;
        next
    }

    /// Reconcile every container's custom values against `custom_fields`
    pub fn reconcile_custom_values(&mut self) {
        let fields = &self.custom_fields;
        for layer in &mut self.layers {
            for container in &mut layer.containers {
                container.reconcile_custom_values(fields);
            }
        }
    }
}

/// Format a length the way labels and summaries print it: at most three
/// decimals, no trailing zeros.
pub fn format_feet(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    format!("{}", rounded)
}
