//! Canonical in-memory yard model
//!
//! Everything here is already validated: the schema upgrader is the only way
//! loosely-typed persisted data becomes a [`Yard`].

pub mod ids;
pub mod types;

pub use ids::generate_id;
pub use types::*;
