//! Persisted schema handling
//!
//! Stored yards may come from any earlier version of the editor. Everything
//! read from storage passes through [`upgrade_yards`] before it reaches the
//! rest of the crate.

pub mod coerce;
pub mod error;
pub mod upgrade;

pub use error::ValidationError;
pub use upgrade::{upgrade_container, upgrade_yard, upgrade_yards};
