//! Mutations of a single yard
//!
//! Each operation checks everything it needs against a shared borrow and only
//! then takes the mutable borrow to commit, so an `Err` never leaves a
//! partially applied change behind.

use log::debug;

use crate::error::EditorError;
use crate::geometry::door::{clamp_offset, DEFAULT_DOOR_OFFSET};
use crate::geometry::{footprint, rotate_doors, Point, QuarterTurn};
use crate::labels;
use crate::model::{
    format_feet, generate_id, Container, ContainerLocation, ContainerType, CustomFieldDef,
    CustomValue, Door, Edge, FieldType, Layer, Rotation, Yard, GROUND_LEVEL, UNTITLED_YARD,
};
use crate::placement::{PlacementError, PlacementOptions, PlacementResolver};
use crate::schema::upgrade::round3;
use crate::schema::ValidationError;
use crate::units::Unit;

/// How a container should move
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Movement {
    /// Relative displacement in yard units
    By { dx: f64, dy: f64 },
    /// Absolute top-left position; snapped when snapping is on
    To(Point),
}

/// Arrow-key nudge of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nudge {
    Up,
    Down,
    Left,
    Right,
}

impl Nudge {
    /// Displacement for one grid cell of side `cell`
    pub fn delta(self, cell: f64) -> (f64, f64) {
        match self {
            Nudge::Up => (0.0, -cell),
            Nudge::Down => (0.0, cell),
            Nudge::Left => (-cell, 0.0),
            Nudge::Right => (cell, 0.0),
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "up" => Some(Nudge::Up),
            "down" => Some(Nudge::Down),
            "left" => Some(Nudge::Left),
            "right" => Some(Nudge::Right),
            _ => None,
        }
    }
}

/// Detail edits for one container. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerPatch {
    pub label: Option<String>,
    pub renter: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub start_date: Option<String>,
    pub monthly_rate: Option<String>,
}

/// Door edits. `None` leaves a field unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DoorPatch {
    pub edge: Option<Edge>,
    pub offset: Option<f64>,
}

impl Yard {
    /// A fresh yard with one empty "Ground Level" layer and a blank rate for
    /// every catalog entry
    pub fn new(
        name: &str,
        width: f64,
        height: f64,
        unit: Unit,
        catalog: &[ContainerType],
    ) -> Result<Self, EditorError> {
        let (w, h) = (round3(width), round3(height));
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(ValidationError::invalid_dimensions("", Some(width), Some(height)).into());
        }
        let trimmed = name.trim();
        let layer = Layer {
            id: generate_id(),
            name: GROUND_LEVEL.to_string(),
            containers: Vec::new(),
        };
        Ok(Yard {
            id: generate_id(),
            name: if trimmed.is_empty() {
                UNTITLED_YARD.to_string()
            } else {
                trimmed.to_string()
            },
            width: w,
            height: h,
            unit,
            active_layer_id: layer.id.clone(),
            layers: vec![layer],
            default_rates: catalog
                .iter()
                .map(|kind| (kind.key.clone(), String::new()))
                .collect(),
            custom_fields: Vec::new(),
            next_container_number: 1,
        })
    }

    fn require_layer(&self, layer_id: &str) -> Result<usize, EditorError> {
        self.layer_index(layer_id)
            .ok_or_else(|| EditorError::not_found("layer", layer_id))
    }

    /// Locate a container that must live in `layer_id`
    fn require_in_layer(
        &self,
        layer_id: &str,
        container_id: &str,
    ) -> Result<ContainerLocation, EditorError> {
        let layer = self.require_layer(layer_id)?;
        self.layers[layer]
            .containers
            .iter()
            .position(|c| c.id == container_id)
            .map(|index| ContainerLocation { layer, index })
            .ok_or_else(|| EditorError::not_found("container", container_id))
    }

    fn require_container_mut(&mut self, container_id: &str) -> Result<&mut Container, EditorError> {
        self.container_mut(container_id)
            .ok_or_else(|| EditorError::not_found("container", container_id))
    }

    // --- containers ---

    /// Place a new container of `kind` with its top-left corner as close to
    /// `desired` as the resolver allows
    pub fn place_new_container(
        &mut self,
        kind: &ContainerType,
        layer_id: &str,
        desired: Point,
        options: PlacementOptions,
    ) -> Result<Container, EditorError> {
        let layer_index = self.require_layer(layer_id)?;
        let fp = footprint(kind.width_ft, Rotation::Deg0, self.unit);
        let origin = PlacementResolver::new(self, &self.layers[layer_index], options)
            .resolve(fp, None, desired)?;

        let label = labels::smallest_available_numeric_label(self.containers()).to_string();
        let container = Container {
            id: generate_id(),
            kind: kind.key.clone(),
            width_ft: kind.width_ft,
            x: origin.x,
            y: origin.y,
            rotation: Rotation::Deg0,
            label,
            renter: String::new(),
            monthly_rate: self.default_rates.get(&kind.key).cloned().unwrap_or_default(),
            phone: String::new(),
            email: String::new(),
            address: String::new(),
            start_date: String::new(),
            occupied: false,
            doors: Vec::new(),
            custom_values: self
                .custom_fields
                .iter()
                .map(|field| (field.id.clone(), field.kind.default_value()))
                .collect(),
        };
        debug!(
            "placed {} '{}' at ({}, {}) in layer '{}'",
            container.kind, container.label, origin.x, origin.y, self.layers[layer_index].name
        );
        self.layers[layer_index].containers.push(container.clone());
        self.refresh_next_container_number();
        Ok(container)
    }

    /// Palette drop: `pointer` marks where the centre of the new container
    /// should land
    pub fn drop_new_container(
        &mut self,
        kind: &ContainerType,
        layer_id: &str,
        pointer: Point,
        options: PlacementOptions,
    ) -> Result<Container, EditorError> {
        let fp = footprint(kind.width_ft, Rotation::Deg0, self.unit);
        let desired = pointer.offset(-fp.width / 2.0, -fp.height / 2.0);
        self.place_new_container(kind, layer_id, desired, options)
    }

    /// Move a container without repair: the clamped target must be free
    pub fn move_container(
        &mut self,
        layer_id: &str,
        container_id: &str,
        movement: Movement,
        options: PlacementOptions,
    ) -> Result<Point, EditorError> {
        let loc = self.require_in_layer(layer_id, container_id)?;
        let layer = &self.layers[loc.layer];
        let container = &layer.containers[loc.index];
        let resolver = PlacementResolver::new(self, layer, options);
        let target = match movement {
            Movement::By { dx, dy } => container.position().offset(dx, dy),
            Movement::To(point) => resolver.snap(point),
        };
        let placed =
            resolver.place_exact(container.footprint(self.unit), Some(container_id), target)?;

        let container = &mut self.layers[loc.layer].containers[loc.index];
        container.x = placed.x;
        container.y = placed.y;
        Ok(placed)
    }

    /// Move a container one grid cell
    pub fn nudge_container(
        &mut self,
        layer_id: &str,
        container_id: &str,
        direction: Nudge,
    ) -> Result<Point, EditorError> {
        let (dx, dy) = direction.delta(self.unit.grid_cell());
        self.move_container(
            layer_id,
            container_id,
            Movement::By { dx, dy },
            PlacementOptions::default().with_snap(false),
        )
    }

    /// Toggle a container between 0° and 90° about its centre.
    ///
    /// Doors turn with the container. If no legal position exists the
    /// container keeps its rotation, position and doors.
    pub fn rotate_container(
        &mut self,
        layer_id: &str,
        container_id: &str,
        options: PlacementOptions,
    ) -> Result<Rotation, EditorError> {
        let loc = self.require_in_layer(layer_id, container_id)?;
        let layer = &self.layers[loc.layer];
        let container = &layer.containers[loc.index];
        let turn = QuarterTurn::toggle(container.rotation);
        let after = footprint(container.width_ft, turn.to, self.unit);
        let origin = turn.recenter(&container.bounds(self.unit), after);
        let placed = PlacementResolver::new(self, layer, options)
            .resolve(after, Some(container_id), origin)
            .map_err(|err| {
                debug!("rotation of '{}' refused: {}", container_id, err);
                PlacementError::Blocked
            })?;

        let container = &mut self.layers[loc.layer].containers[loc.index];
        container.rotation = turn.to;
        container.x = placed.x;
        container.y = placed.y;
        rotate_doors(&mut container.doors, turn.direction());
        Ok(turn.to)
    }

    pub fn remove_container(
        &mut self,
        layer_id: &str,
        container_id: &str,
    ) -> Result<Container, EditorError> {
        let loc = self.require_in_layer(layer_id, container_id)?;
        let removed = self.layers[loc.layer].containers.remove(loc.index);
        self.refresh_next_container_number();
        debug!("removed container '{}'", removed.label);
        Ok(removed)
    }

    // --- layers ---

    /// Append a layer on top of the stack and make it active. A blank name
    /// becomes "Layer N".
    pub fn add_layer(&mut self, name: &str) -> String {
        let trimmed = name.trim();
        let layer = Layer {
            id: generate_id(),
            name: if trimmed.is_empty() {
                format!("Layer {}", self.layers.len() + 1)
            } else {
                trimmed.to_string()
            },
            containers: Vec::new(),
        };
        let id = layer.id.clone();
        self.layers.push(layer);
        self.active_layer_id = id.clone();
        id
    }

    pub fn rename_layer(&mut self, layer_id: &str, name: &str) -> Result<(), EditorError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(EditorError::invalid("layer name", "must not be blank"));
        }
        let index = self.require_layer(layer_id)?;
        self.layers[index].name = trimmed.to_string();
        Ok(())
    }

    /// Delete a layer and every container on it. The last layer cannot go.
    pub fn remove_layer(&mut self, layer_id: &str) -> Result<Layer, EditorError> {
        let index = self.require_layer(layer_id)?;
        if self.layers.len() <= 1 {
            return Err(EditorError::refused("a yard must keep at least one layer"));
        }
        let removed = self.layers.remove(index);
        self.ensure_active_layer();
        self.refresh_next_container_number();
        debug!(
            "removed layer '{}' with {} container(s)",
            removed.name,
            removed.containers.len()
        );
        Ok(removed)
    }

    pub fn set_active_layer(&mut self, layer_id: &str) -> Result<(), EditorError> {
        self.require_layer(layer_id)?;
        self.active_layer_id = layer_id.to_string();
        Ok(())
    }

    // --- custom fields ---

    /// Define a new custom field; every container gets its default value
    pub fn add_field(&mut self, label: &str, kind: FieldType) -> Result<String, EditorError> {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return Err(EditorError::invalid("field label", "must not be blank"));
        }
        let field = CustomFieldDef {
            id: generate_id(),
            label: trimmed.to_string(),
            kind,
        };
        let id = field.id.clone();
        self.custom_fields.push(field);
        self.reconcile_custom_values();
        Ok(id)
    }

    /// Delete a custom field and prune its value from every container
    pub fn remove_field(&mut self, field_id: &str) -> Result<CustomFieldDef, EditorError> {
        let index = self
            .custom_fields
            .iter()
            .position(|field| field.id == field_id)
            .ok_or_else(|| EditorError::not_found("field", field_id))?;
        let removed = self.custom_fields.remove(index);
        self.reconcile_custom_values();
        Ok(removed)
    }

    // --- doors ---

    /// Add a door centred on the north edge
    pub fn add_door(&mut self, container_id: &str) -> Result<String, EditorError> {
        let container = self.require_container_mut(container_id)?;
        let door = Door {
            id: generate_id(),
            edge: Edge::North,
            offset: DEFAULT_DOOR_OFFSET,
        };
        let id = door.id.clone();
        container.doors.push(door);
        Ok(id)
    }

    pub fn update_door(
        &mut self,
        container_id: &str,
        door_id: &str,
        patch: DoorPatch,
    ) -> Result<Door, EditorError> {
        let container = self.require_container_mut(container_id)?;
        let door = container
            .doors
            .iter_mut()
            .find(|door| door.id == door_id)
            .ok_or_else(|| EditorError::not_found("door", door_id))?;
        if let Some(edge) = patch.edge {
            door.edge = edge;
        }
        if let Some(offset) = patch.offset {
            door.offset = clamp_offset(offset);
        }
        Ok(door.clone())
    }

    pub fn remove_door(&mut self, container_id: &str, door_id: &str) -> Result<Door, EditorError> {
        let container = self.require_container_mut(container_id)?;
        let index = container
            .doors
            .iter()
            .position(|door| door.id == door_id)
            .ok_or_else(|| EditorError::not_found("door", door_id))?;
        Ok(container.doors.remove(index))
    }

    // --- details ---

    /// Apply detail edits. A blank label falls back to the nominal width.
    pub fn update_details(
        &mut self,
        container_id: &str,
        patch: ContainerPatch,
    ) -> Result<(), EditorError> {
        let container = self.require_container_mut(container_id)?;
        if let Some(label) = patch.label {
            let trimmed = label.trim();
            container.label = if trimmed.is_empty() {
                format_feet(container.width_ft)
            } else {
                trimmed.to_string()
            };
        }
        let ContainerPatch {
            renter,
            phone,
            email,
            address,
            start_date,
            monthly_rate,
            ..
        } = patch;
        for (slot, value) in [
            (&mut container.renter, renter),
            (&mut container.phone, phone),
            (&mut container.email, email),
            (&mut container.address, address),
            (&mut container.monthly_rate, monthly_rate),
        ] {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if let Some(start_date) = start_date {
            container.start_date = start_date.trim().to_string();
        }
        self.refresh_next_container_number();
        Ok(())
    }

    /// Set the occupied flag; clearing it wipes every occupancy detail
    pub fn set_occupied(&mut self, container_id: &str, occupied: bool) -> Result<(), EditorError> {
        let container = self.require_container_mut(container_id)?;
        container.occupied = occupied;
        if !occupied {
            container.clear_occupancy();
        }
        Ok(())
    }

    /// Store a custom value, converted to the field's type
    pub fn set_custom_value(
        &mut self,
        container_id: &str,
        field_id: &str,
        value: CustomValue,
    ) -> Result<(), EditorError> {
        let kind = self
            .custom_fields
            .iter()
            .find(|field| field.id == field_id)
            .map(|field| field.kind)
            .ok_or_else(|| EditorError::not_found("field", field_id))?;
        let container = self.require_container_mut(container_id)?;
        container
            .custom_values
            .insert(field_id.to_string(), value.coerce(kind));
        Ok(())
    }

    /// Set the default monthly rate for a known container type
    pub fn set_default_rate(&mut self, type_key: &str, rate: &str) -> Result<(), EditorError> {
        let slot = self
            .default_rates
            .get_mut(type_key)
            .ok_or_else(|| EditorError::not_found("container type", type_key))?;
        *slot = rate.to_string();
        Ok(())
    }
}
