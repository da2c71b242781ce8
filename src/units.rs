//! Display units and grid arithmetic
//!
//! All nominal container dimensions are stored in feet. Yard coordinates are
//! expressed in the yard's display unit, so every geometric computation goes
//! through [`Unit::from_feet`] first.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Length unit a yard is measured in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Ft,
    M,
    Cm,
}

impl Unit {
    pub const ALL: [Unit; 3] = [Unit::Ft, Unit::M, Unit::Cm];

    /// Multiplier converting one foot into this unit
    pub fn factor(self) -> f64 {
        match self {
            Unit::Ft => 1.0,
            Unit::M => 0.3048,
            Unit::Cm => 30.48,
        }
    }

    /// Convert a length in feet into this unit
    pub fn from_feet(self, feet: f64) -> f64 {
        feet * self.factor()
    }

    /// Side length of one grid cell: one nominal foot in this unit
    pub fn grid_cell(self) -> f64 {
        self.from_feet(1.0)
    }

    /// Round a coordinate to the nearest grid line (halves round up)
    pub fn snap(self, value: f64) -> f64 {
        let cell = self.grid_cell();
        (value / cell + 0.5).floor() * cell
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Ft => "ft",
            Unit::M => "m",
            Unit::Cm => "cm",
        }
    }

    /// Parse a persisted unit tag; anything outside the closed set is `None`
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|unit| unit.as_str() == tag)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factors() {
        assert_eq!(Unit::Ft.from_feet(20.0), 20.0);
        assert!((Unit::M.from_feet(10.0) - 3.048).abs() < 1e-12);
        assert!((Unit::Cm.from_feet(8.0) - 243.84).abs() < 1e-9);
    }

    #[test]
    fn test_grid_cell_is_one_foot() {
        assert_eq!(Unit::Ft.grid_cell(), 1.0);
        assert_eq!(Unit::M.grid_cell(), 0.3048);
        assert_eq!(Unit::Cm.grid_cell(), 30.48);
    }

    #[test]
    fn test_snap_rounds_to_nearest_cell() {
        assert_eq!(Unit::Ft.snap(3.4), 3.0);
        assert_eq!(Unit::Ft.snap(3.5), 4.0);
        assert_eq!(Unit::Ft.snap(-0.4), 0.0);
        assert!((Unit::M.snap(0.5) - 0.6096).abs() < 1e-12);
    }

    #[test]
    fn test_parse_closed_set() {
        assert_eq!(Unit::parse("m"), Some(Unit::M));
        assert_eq!(Unit::parse("cm"), Some(Unit::Cm));
        assert_eq!(Unit::parse("yards"), None);
        assert_eq!(Unit::parse("FT"), None);
    }
}
