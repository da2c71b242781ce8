//! Error types for the placement resolver

use thiserror::Error;

/// Reasons a container cannot take a requested position
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlacementError {
    /// Snapped placement searched every ring without finding a free cell
    #[error("no free space available near ({x:.3}, {y:.3})")]
    NoFreeSpace { x: f64, y: f64 },

    /// Unsnapped placement landed on another container; no repair is tried
    #[error("containers cannot overlap (blocked by '{blocker}')")]
    Overlap { blocker: String },

    /// A move or rotation of an existing container was refused
    #[error("movement blocked by collision or bounds")]
    Blocked,
}

impl PlacementError {
    pub fn no_free_space(x: f64, y: f64) -> Self {
        Self::NoFreeSpace { x, y }
    }

    pub fn overlap(blocker: impl Into<String>) -> Self {
        Self::Overlap {
            blocker: blocker.into(),
        }
    }
}
