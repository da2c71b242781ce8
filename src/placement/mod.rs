//! Placement resolver
//!
//! Turns a desired container position into a legal one: snapped to the grid,
//! inside the yard, and clear of every other container on the same layer.

pub mod error;
pub mod resolver;
pub mod ring;

pub use error::PlacementError;
pub use resolver::{PlacementOptions, PlacementResolver, DEFAULT_MAX_SEARCH_RINGS};
pub use ring::RingOffsets;
