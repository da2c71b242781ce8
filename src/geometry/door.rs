//! Door rectangles along container edges

use crate::model::{Container, Door, Edge};
use crate::units::Unit;

use super::transform::{rotate_edge, RotationDirection};
use super::types::{BoundingBox, Footprint};

/// Physical length of a door opening, in feet
pub const DOOR_LENGTH_FT: f64 = 3.0;

/// Physical thickness of a drawn door, in feet
pub const DOOR_THICKNESS_FT: f64 = 0.75;

/// Offset assigned to doors whose stored offset is unusable
pub const DEFAULT_DOOR_OFFSET: f64 = 0.5;

/// Clamp an offset into [0, 1]; non-finite offsets become the midpoint
pub fn clamp_offset(offset: f64) -> f64 {
    if offset.is_finite() {
        offset.clamp(0.0, 1.0)
    } else {
        DEFAULT_DOOR_OFFSET
    }
}

/// Door rectangle relative to the container's top-left corner.
///
/// North/south doors run along x and sit flush with the top/bottom edge;
/// east/west doors are the transpose. Offset 0 is flush with the start of
/// the edge and 1 flush with its end.
pub fn door_rect(footprint: Footprint, door: &Door, unit: Unit) -> BoundingBox {
    let offset = clamp_offset(door.offset);
    let length = unit.from_feet(DOOR_LENGTH_FT);
    let thickness = unit.from_feet(DOOR_THICKNESS_FT);

    match door.edge {
        Edge::North | Edge::South => {
            let width = length.min(footprint.width);
            let height = thickness.min(footprint.height);
            let x = offset * (footprint.width - width).max(0.0);
            let y = match door.edge {
                Edge::North => 0.0,
                _ => (footprint.height - height).max(0.0),
            };
            BoundingBox::new(x, y, width, height)
        }
        Edge::East | Edge::West => {
            let width = thickness.min(footprint.width);
            let height = length.min(footprint.height);
            let y = offset * (footprint.height - height).max(0.0);
            let x = match door.edge {
                Edge::West => 0.0,
                _ => (footprint.width - width).max(0.0),
            };
            BoundingBox::new(x, y, width, height)
        }
    }
}

/// Door rectangles of `container` in yard coordinates
pub fn door_rects(container: &Container, unit: Unit) -> Vec<BoundingBox> {
    let footprint = container.footprint(unit);
    container
        .doors
        .iter()
        .map(|door| {
            let local = door_rect(footprint, door, unit);
            BoundingBox::new(
                container.x + local.x,
                container.y + local.y,
                local.width,
                local.height,
            )
        })
        .collect()
}

/// Turn every door of a container with it; offsets are preserved
pub fn rotate_doors(doors: &mut [Door], direction: RotationDirection) {
    for door in doors {
        door.edge = rotate_edge(door.edge, direction);
    }
}
