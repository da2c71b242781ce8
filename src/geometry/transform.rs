//! Quarter-turn rotation of a container about its own center.
//!
//! Containers only ever toggle between 0° and 90°. Turning from 0° to 90° is
//! a clockwise turn; turning back is counter-clockwise. With y pointing down,
//! clockwise maps north → east → south → west → north.

use crate::model::{Edge, Rotation};

use super::types::{BoundingBox, Footprint, Point};

/// Sense of a quarter turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

/// Remap a door edge through a quarter turn in `direction`
pub fn rotate_edge(edge: Edge, direction: RotationDirection) -> Edge {
    match direction {
        RotationDirection::Clockwise => match edge {
            Edge::North => Edge::East,
            Edge::East => Edge::South,
            Edge::South => Edge::West,
            Edge::West => Edge::North,
        },
        RotationDirection::CounterClockwise => match edge {
            Edge::North => Edge::West,
            Edge::West => Edge::South,
            Edge::South => Edge::East,
            Edge::East => Edge::North,
        },
    }
}

/// A toggle between the two orientations of one container
#[derive(Debug, Clone, Copy)]
pub struct QuarterTurn {
    pub from: Rotation,
    pub to: Rotation,
}

impl QuarterTurn {
    /// The turn that toggles `current`
    pub fn toggle(current: Rotation) -> Self {
        Self {
            from: current,
            to: current.toggled(),
        }
    }

    pub fn direction(&self) -> RotationDirection {
        match (self.from, self.to) {
            (Rotation::Deg0, Rotation::Deg90) => RotationDirection::Clockwise,
            _ => RotationDirection::CounterClockwise,
        }
    }

    /// Top-left corner that keeps the center of `before` fixed once the
    /// container occupies `after`.
    pub fn recenter(&self, before: &BoundingBox, after: Footprint) -> Point {
        let center = before.center();
        Point::new(center.x - after.width / 2.0, center.y - after.height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clockwise_cycle() {
        let mut edge = Edge::North;
        let mut seen = vec![];
        for _ in 0..4 {
            edge = rotate_edge(edge, RotationDirection::Clockwise);
            seen.push(edge);
        }
        assert_eq!(seen, vec![Edge::East, Edge::South, Edge::West, Edge::North]);
    }

    #[test]
    fn test_counter_clockwise_inverts_clockwise() {
        for edge in Edge::ALL {
            let turned = rotate_edge(edge, RotationDirection::Clockwise);
            assert_eq!(rotate_edge(turned, RotationDirection::CounterClockwise), edge);
        }
    }

    #[test]
    fn test_turn_direction() {
        assert_eq!(
            QuarterTurn::toggle(Rotation::Deg0).direction(),
            RotationDirection::Clockwise
        );
        assert_eq!(
            QuarterTurn::toggle(Rotation::Deg90).direction(),
            RotationDirection::CounterClockwise
        );
    }

    #[test]
    fn test_recenter_preserves_center() {
        let turn = QuarterTurn::toggle(Rotation::Deg0);
        let before = BoundingBox::new(20.0, 20.0, 20.0, 8.0);
        let origin = turn.recenter(&before, Footprint::new(8.0, 20.0));
        assert_eq!(origin, Point::new(26.0, 14.0));
        let after = Footprint::new(8.0, 20.0).at(origin);
        assert_eq!(after.center(), before.center());
    }
}
