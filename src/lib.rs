//! Yard Planner - a placement engine for container yard layouts
//!
//! This library provides the data model, geometry, collision-aware placement
//! and persisted-schema upgrade behind a 2D yard-layout editor.
//!
//! # Example
//!
//! ```rust
//! use yard_planner::{EditorConfig, Point, Unit, Yard};
//!
//! let config = EditorConfig::default();
//! let mut yard = Yard::new("North Lot", 100.0, 60.0, Unit::Ft, &config.container_types).unwrap();
//! let layer = yard.active_layer_id.clone();
//! let kind = config.container_type("20ft").unwrap().clone();
//!
//! let first = yard
//!     .place_new_container(&kind, &layer, Point::new(0.0, 0.0), config.placement_options())
//!     .unwrap();
//! // The requested spot overlaps the first container, so the resolver
//! // searches outward for the nearest free grid cell.
//! let second = yard
//!     .place_new_container(&kind, &layer, Point::new(10.0, 0.0), config.placement_options())
//!     .unwrap();
//!
//! assert_eq!((first.label.as_str(), second.label.as_str()), ("1", "2"));
//! assert_eq!((second.x, second.y), (2.0, 8.0));
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod labels;
pub mod model;
pub mod persist;
pub mod placement;
pub mod report;
pub mod schema;
pub mod session;
pub mod store;
pub mod units;

pub use config::{ConfigError, EditorConfig};
pub use error::EditorError;
pub use geometry::{BoundingBox, Footprint, Point};
pub use model::{
    Container, ContainerType, CustomFieldDef, CustomValue, Door, Edge, FieldType, Layer, Rotation,
    Yard,
};
pub use persist::{FileStorage, MemoryStorage, Preferences, Storage, StorageError, Tab, Theme};
pub use placement::{PlacementError, PlacementOptions, PlacementResolver};
pub use schema::{upgrade_yard, upgrade_yards, ValidationError};
pub use session::{DragSession, EditorState, ViewTransform, Viewport};
pub use store::{ContainerPatch, DoorPatch, Movement, Nudge, YardBook};
pub use units::Unit;

/// Load the yard collection and preferences from `storage` into a fresh
/// editor state
pub fn open_editor(storage: &impl Storage, config: EditorConfig) -> Result<EditorState, EditorError> {
    let book = persist::load_book(storage, &config.container_types)?;
    let mut state = EditorState::new(book, config);
    state.preferences = persist::load_preferences(storage)?;
    Ok(state)
}

/// Write the yard collection and preferences back to `storage`
pub fn save_editor(storage: &mut impl Storage, state: &EditorState) -> Result<(), EditorError> {
    persist::save_book(storage, &state.book)?;
    persist::save_preferences(storage, state.preferences)?;
    Ok(())
}
