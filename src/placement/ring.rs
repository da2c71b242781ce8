//! Grid offsets ordered by expanding square rings.
//!
//! Ring `r` holds every offset whose Chebyshev distance from the origin is
//! exactly `r`. Within a ring offsets are produced column by column
//! (`dx` ascending, then `dy` ascending). Interior cells are never revisited.

/// Iterator over `(dx, dy)` grid offsets for rings `0..=max_radius`
#[derive(Debug, Clone)]
pub struct RingOffsets {
    radius: i64,
    max_radius: i64,
    dx: i64,
    dy: i64,
}

impl RingOffsets {
    /// A negative `max_radius` yields nothing
    pub fn new(max_radius: i64) -> Self {
        Self {
            radius: 0,
            max_radius,
            dx: 0,
            dy: 0,
        }
    }

    fn start_ring(&mut self, radius: i64) {
        self.radius = radius;
        self.dx = -radius;
        self.dy = -radius;
    }
}

impl Iterator for RingOffsets {
    type Item = (i64, i64);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let r = self.radius;
            if r > self.max_radius {
                return None;
            }
            if r == 0 {
                self.start_ring(1);
                return Some((0, 0));
            }
            if self.dx > r {
                self.start_ring(r + 1);
                continue;
            }

            let item = (self.dx, self.dy);
            if self.dx.abs() == r {
                // outer columns are walked in full
                if self.dy < r {
                    self.dy += 1;
                } else {
                    self.dx += 1;
                    self.dy = -r;
                }
            } else if self.dy == -r {
                self.dy = r;
            } else {
                self.dx += 1;
                self.dy = -r;
            }
            return Some(item);
        }
    }
}
