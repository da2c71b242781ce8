//! Footprints, bounds clamping and same-layer collision tests

use crate::model::{Container, Layer, Rotation, Yard};
use crate::units::Unit;

use super::types::{BoundingBox, Footprint, Point};

/// Fixed depth of every container, in feet
pub const CONTAINER_DEPTH_FT: f64 = 8.0;

/// Footprint of a container with nominal width `width_ft` in `unit`.
///
/// At 0° the nominal width runs along x and the depth along y; a quarter
/// turn swaps them.
pub fn footprint(width_ft: f64, rotation: Rotation, unit: Unit) -> Footprint {
    let base = Footprint::new(unit.from_feet(width_ft), unit.from_feet(CONTAINER_DEPTH_FT));
    match rotation {
        Rotation::Deg0 => base,
        Rotation::Deg90 => base.transposed(),
    }
}

impl Container {
    pub fn footprint(&self, unit: Unit) -> Footprint {
        footprint(self.width_ft, self.rotation, unit)
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Bounding box at the container's current position
    pub fn bounds(&self, unit: Unit) -> BoundingBox {
        self.footprint(unit).at(self.position())
    }
}

impl Yard {
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(0.0, 0.0, self.width, self.height)
    }
}

/// Clamp a top-left position so the footprint stays inside the yard.
///
/// A footprint larger than the yard is pinned to 0 on that axis; the result
/// is never negative.
pub fn clamp_to_yard(yard: &Yard, position: Point, footprint: Footprint) -> Point {
    let max_x = (yard.width - footprint.width).max(0.0);
    let max_y = (yard.height - footprint.height).max(0.0);
    Point::new(position.x.max(0.0).min(max_x), position.y.max(0.0).min(max_y))
}

/// First container in `layer` whose box overlaps `candidate`, skipping the
/// container with id `ignore_id`.
pub fn first_collision<'a>(
    unit: Unit,
    layer: &'a Layer,
    candidate: &BoundingBox,
    ignore_id: Option<&str>,
) -> Option<&'a Container> {
    layer
        .containers
        .iter()
        .filter(|other| Some(other.id.as_str()) != ignore_id)
        .find(|other| other.bounds(unit).intersects(candidate))
}

/// Whether `candidate` overlaps any container of `layer` other than
/// `ignore_id`. Other layers are never consulted.
pub fn collides(yard: &Yard, layer: &Layer, candidate: &BoundingBox, ignore_id: Option<&str>) -> bool {
    first_collision(yard.unit, layer, candidate, ignore_id).is_some()
}
