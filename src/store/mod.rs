//! The mutable yard store
//!
//! [`YardBook`] owns the collection; per-yard mutations are methods on
//! [`Yard`](crate::model::Yard) defined in [`yard`].

pub mod book;
pub mod yard;

pub use book::YardBook;
pub use yard::{ContainerPatch, DoorPatch, Movement, Nudge};
