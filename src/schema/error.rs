//! Reasons a persisted record is dropped during upgrade

use thiserror::Error;

/// Why a persisted yard record could not be recovered
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The record is not a JSON object
    #[error("yard record is not an object")]
    NotAnObject,

    /// Width or height is missing, non-numeric, or not positive
    #[error("yard '{id}' has no usable dimensions (width: {width:?}, height: {height:?})")]
    InvalidDimensions {
        id: String,
        width: Option<f64>,
        height: Option<f64>,
    },

    /// A user-supplied value was rejected before reaching the model
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

impl ValidationError {
    pub fn invalid_dimensions(
        id: impl Into<String>,
        width: Option<f64>,
        height: Option<f64>,
    ) -> Self {
        Self::InvalidDimensions {
            id: id.into(),
            width,
            height,
        }
    }

    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}
