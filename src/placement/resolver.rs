//! Placement resolver: snap, clamp, test, and search for a free cell.

use log::debug;

use crate::geometry::{clamp_to_yard, first_collision, Footprint, Point};
use crate::model::{Layer, Yard};

use super::error::PlacementError;
use super::ring::RingOffsets;

/// Default cap on the number of rings the nearest-spot search visits
pub const DEFAULT_MAX_SEARCH_RINGS: u32 = 60;

/// Knobs controlling how a desired position is repaired
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementOptions {
    /// Snap positions to the one-foot grid and allow the ring search
    pub snap: bool,
    /// Upper bound on rings visited (ring 0 included)
    pub max_search_rings: u32,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            snap: true,
            max_search_rings: DEFAULT_MAX_SEARCH_RINGS,
        }
    }
}

impl PlacementOptions {
    pub fn with_snap(mut self, snap: bool) -> Self {
        self.snap = snap;
        self
    }

    pub fn with_max_search_rings(mut self, rings: u32) -> Self {
        self.max_search_rings = rings;
        self
    }
}

/// Resolves container positions against one layer of one yard
#[derive(Debug, Clone, Copy)]
pub struct PlacementResolver<'a> {
    yard: &'a Yard,
    layer: &'a Layer,
    options: PlacementOptions,
}

impl<'a> PlacementResolver<'a> {
    pub fn new(yard: &'a Yard, layer: &'a Layer, options: PlacementOptions) -> Self {
        Self {
            yard,
            layer,
            options,
        }
    }

    /// Snap a point to the grid when snapping is enabled
    pub fn snap(&self, point: Point) -> Point {
        if self.options.snap {
            let unit = self.yard.unit;
            Point::new(unit.snap(point.x), unit.snap(point.y))
        } else {
            point
        }
    }

    /// Largest ring radius the search visits for this yard
    pub fn search_radius(&self) -> i64 {
        let cell = self.yard.unit.grid_cell();
        let span = self.yard.width.max(self.yard.height) / cell;
        let by_size = span.ceil() as i64 + 2;
        by_size.min(i64::from(self.options.max_search_rings) - 1)
    }

    /// Whether `footprint` at `origin` lies inside the yard
    pub fn fits(&self, footprint: Footprint, origin: Point) -> bool {
        self.yard.bounds().encloses(&footprint.at(origin))
    }

    /// Whether `footprint` at `origin` lies inside the yard and is free of
    /// same-layer overlap
    pub fn is_free(&self, footprint: Footprint, origin: Point, ignore_id: Option<&str>) -> bool {
        self.fits(footprint, origin)
            && first_collision(self.yard.unit, self.layer, &footprint.at(origin), ignore_id)
                .is_none()
    }

    /// Resolve a desired top-left position.
    ///
    /// The position is snapped (when enabled) and clamped. On collision a
    /// snapped placement searches outward ring by ring; an unsnapped one
    /// fails with [`PlacementError::Overlap`]. A footprint larger than the
    /// yard fits nowhere and is refused without searching.
    pub fn resolve(
        &self,
        footprint: Footprint,
        ignore_id: Option<&str>,
        desired: Point,
    ) -> Result<Point, PlacementError> {
        let start = clamp_to_yard(self.yard, self.snap(desired), footprint);
        if !self.fits(footprint, start) {
            debug!(
                "{} x {} footprint does not fit the {} x {} yard",
                footprint.width, footprint.height, self.yard.width, self.yard.height
            );
            return Err(if self.options.snap {
                PlacementError::no_free_space(start.x, start.y)
            } else {
                PlacementError::Blocked
            });
        }
        let candidate = footprint.at(start);
        let Some(blocker) = first_collision(self.yard.unit, self.layer, &candidate, ignore_id)
        else {
            return Ok(start);
        };

        if !self.options.snap {
            return Err(PlacementError::overlap(blocker.id.clone()));
        }

        self.nearest_free(footprint, ignore_id, start)
            .ok_or_else(|| PlacementError::no_free_space(start.x, start.y))
    }

    /// Clamp `target` and accept it only if it is free; no snapping or search
    pub fn place_exact(
        &self,
        footprint: Footprint,
        ignore_id: Option<&str>,
        target: Point,
    ) -> Result<Point, PlacementError> {
        let clamped = clamp_to_yard(self.yard, target, footprint);
        if self.is_free(footprint, clamped, ignore_id) {
            Ok(clamped)
        } else {
            Err(PlacementError::Blocked)
        }
    }

    /// Nearest free grid position around `start`, searching rings outward
    pub fn nearest_free(
        &self,
        footprint: Footprint,
        ignore_id: Option<&str>,
        start: Point,
    ) -> Option<Point> {
        let cell = self.yard.unit.grid_cell();
        let max_radius = self.search_radius();
        let found = RingOffsets::new(max_radius)
            .map(|(dx, dy)| {
                let shifted = start.offset(dx as f64 * cell, dy as f64 * cell);
                clamp_to_yard(self.yard, shifted, footprint)
            })
            .find(|origin| self.is_free(footprint, *origin, ignore_id));

        match found {
            Some(origin) => debug!(
                "free cell at ({}, {}) for start ({}, {}) in layer '{}'",
                origin.x, origin.y, start.x, start.y, self.layer.name
            ),
            None => debug!(
                "no free cell within {} rings of ({}, {}) in layer '{}'",
                max_radius, start.x, start.y, self.layer.name
            ),
        }
        found
    }
}
