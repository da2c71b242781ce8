//! Editor configuration
//!
//! Everything tunable about the editor lives in [`EditorConfig`]: snapping,
//! the search cap, zoom limits and the container-type catalog. A TOML file
//! may override any subset of the defaults.
//!
//! ```toml
//! snap_enabled = false
//! zoom_max = 4.0
//!
//! [[container_types]]
//! key = "20ft"
//! width_ft = 20.0
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ContainerType;
use crate::placement::{PlacementOptions, DEFAULT_MAX_SEARCH_RINGS};

/// Errors that can occur when loading an editor configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Smallest zoom factor the view accepts
pub const DEFAULT_ZOOM_MIN: f64 = 0.4;

/// Largest zoom factor the view accepts
pub const DEFAULT_ZOOM_MAX: f64 = 6.0;

/// Container sizes offered when no catalog is configured
pub fn default_container_types() -> Vec<ContainerType> {
    [8.0, 10.0, 20.0, 40.0, 45.0]
        .into_iter()
        .map(|width: f64| ContainerType::new(format!("{}ft", width), width))
        .collect()
}

/// Configuration for the editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Snap positions to the grid and repair collisions by searching
    pub snap_enabled: bool,
    /// Cap on rings visited by the nearest-free-cell search
    pub max_search_rings: u32,
    pub zoom_min: f64,
    pub zoom_max: f64,
    /// Palette of container sizes, in display order
    pub container_types: Vec<ContainerType>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_enabled: true,
            max_search_rings: DEFAULT_MAX_SEARCH_RINGS,
            zoom_min: DEFAULT_ZOOM_MIN,
            zoom_max: DEFAULT_ZOOM_MAX,
            container_types: default_container_types(),
        }
    }
}

impl EditorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML string; omitted keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Render the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Check the cross-field constraints serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.zoom_min > 0.0 && self.zoom_min <= self.zoom_max) {
            return Err(ConfigError::Invalid(format!(
                "zoom range [{}, {}] is empty or non-positive",
                self.zoom_min, self.zoom_max
            )));
        }
        if self.container_types.is_empty() {
            return Err(ConfigError::Invalid(
                "container_types must not be empty".to_string(),
            ));
        }
        let mut keys = HashSet::new();
        for kind in &self.container_types {
            if kind.key.trim().is_empty() {
                return Err(ConfigError::Invalid("container type key is blank".to_string()));
            }
            if !(kind.width_ft.is_finite() && kind.width_ft > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "container type '{}' has non-positive width",
                    kind.key
                )));
            }
            if !keys.insert(kind.key.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "container type '{}' is declared twice",
                    kind.key
                )));
            }
        }
        Ok(())
    }

    /// Enable or disable grid snapping
    pub fn with_snap(mut self, snap: bool) -> Self {
        self.snap_enabled = snap;
        self
    }

    /// Set the ring cap for the free-cell search
    pub fn with_max_search_rings(mut self, rings: u32) -> Self {
        self.max_search_rings = rings;
        self
    }

    /// Set the zoom limits
    pub fn with_zoom_limits(mut self, min: f64, max: f64) -> Self {
        self.zoom_min = min;
        self.zoom_max = max;
        self
    }

    /// Replace the container-type catalog
    pub fn with_container_types(mut self, types: Vec<ContainerType>) -> Self {
        self.container_types = types;
        self
    }

    /// Look up a catalog entry by key
    pub fn container_type(&self, key: &str) -> Option<&ContainerType> {
        self.container_types.iter().find(|kind| kind.key == key)
    }

    /// Placement knobs implied by this configuration
    pub fn placement_options(&self) -> PlacementOptions {
        PlacementOptions::default()
            .with_snap(self.snap_enabled)
            .with_max_search_rings(self.max_search_rings)
    }
}
