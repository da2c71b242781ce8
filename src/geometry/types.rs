//! Primitive geometry shared by the collision, door and placement code
//!
//! Coordinates are in yard display units with the origin at the yard's
//! top-left corner and y growing downwards.

/// Tolerance for comparing edges computed through float unit conversion
pub const EPSILON: f64 = 1e-9;

/// A 2D point in yard coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate by a delta
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Occupied width × height of a container after rotation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub width: f64,
    pub height: f64,
}

impl Footprint {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Footprint with the axes exchanged
    pub fn transposed(self) -> Self {
        Self::new(self.height, self.width)
    }

    /// Bounding box of this footprint with its top-left corner at `origin`
    pub fn at(self, origin: Point) -> BoundingBox {
        BoundingBox::new(origin.x, origin.y, self.width, self.height)
    }
}

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point of the bounding box
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Check if `other` lies completely inside this box
    pub fn encloses(&self, other: &BoundingBox) -> bool {
        other.x >= self.x - EPSILON
            && other.y >= self.y - EPSILON
            && other.right() <= self.right() + EPSILON
            && other.bottom() <= self.bottom() + EPSILON
    }

    /// Check if this bounding box overlaps another with positive area.
    /// Boxes that only share an edge do not intersect.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.x < other.right() - EPSILON
            && self.right() > other.x + EPSILON
            && self.y < other.bottom() - EPSILON
            && self.bottom() > other.y + EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = BoundingBox::new(0.0, 0.0, 20.0, 8.0);
        let right = BoundingBox::new(20.0, 0.0, 20.0, 8.0);
        let below = BoundingBox::new(0.0, 8.0, 20.0, 8.0);
        assert!(!a.intersects(&right));
        assert!(!a.intersects(&below));
    }

    #[test]
    fn test_overlap_intersects() {
        let a = BoundingBox::new(0.0, 0.0, 20.0, 8.0);
        let b = BoundingBox::new(10.0, 0.0, 20.0, 8.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_converted_edges_touch_exactly() {
        let width = 20.0 * 0.3048;
        let a = BoundingBox::new(0.0, 0.0, width, 8.0 * 0.3048);
        let b = BoundingBox::new(20.0 * 0.3048, 0.0, width, 8.0 * 0.3048);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_center_and_edges() {
        let b = BoundingBox::new(10.0, 20.0, 20.0, 8.0);
        assert_eq!(b.right(), 30.0);
        assert_eq!(b.bottom(), 28.0);
        assert_eq!(b.center(), Point::new(20.0, 24.0));
    }

    #[test]
    fn test_encloses() {
        let yard = BoundingBox::new(0.0, 0.0, 100.0, 60.0);
        assert!(yard.encloses(&BoundingBox::new(80.0, 52.0, 20.0, 8.0)));
        assert!(!yard.encloses(&BoundingBox::new(81.0, 52.0, 20.0, 8.0)));
    }

    #[test]
    fn test_footprint_transpose() {
        let f = Footprint::new(20.0, 8.0);
        assert_eq!(f.transposed(), Footprint::new(8.0, 20.0));
        assert_eq!(
            f.at(Point::new(1.0, 2.0)),
            BoundingBox::new(1.0, 2.0, 20.0, 8.0)
        );
    }
}
