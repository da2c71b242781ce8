//! Error taxonomy for editor operations
//!
//! Every failure is recoverable: an operation that returns `Err` has left the
//! yard exactly as it found it.

use thiserror::Error;

use crate::config::ConfigError;
use crate::persist::StorageError;
use crate::placement::PlacementError;
use crate::schema::ValidationError;

/// Errors returned by yard, layer and container operations
#[derive(Debug, Error)]
pub enum EditorError {
    /// Malformed input; the offending value was not applied
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Collision or bounds violation with no repair possible
    #[error("placement failed: {0}")]
    Placement(#[from] PlacementError),

    /// The referenced entity no longer exists; callers usually treat this
    /// as a no-op
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    /// The operation would break a structural rule and was refused
    #[error("refused: {reason}")]
    StructuralInvariant { reason: String },

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EditorError {
    /// Create a not-found error for an entity of `kind`
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Create a structural-invariant error
    pub fn refused(reason: impl Into<String>) -> Self {
        Self::StructuralInvariant {
            reason: reason.into(),
        }
    }

    /// Create a validation error for a rejected user-supplied value
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation(ValidationError::invalid_input(field, reason))
    }

    /// Whether the error only reports a stale reference
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether the error is a blocked move, rotation or placement
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Placement(_))
    }
}
