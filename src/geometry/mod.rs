//! Geometry engine: footprints, collisions, rotation and doors

pub mod collision;
pub mod door;
pub mod transform;
pub mod types;

pub use collision::{clamp_to_yard, collides, first_collision, footprint, CONTAINER_DEPTH_FT};
pub use door::{door_rect, door_rects, rotate_doors};
pub use transform::{rotate_edge, QuarterTurn, RotationDirection};
pub use types::{BoundingBox, Footprint, Point};
