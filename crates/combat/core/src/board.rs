//! Static battlefield layout consulted by movement validation.

use std::collections::BTreeSet;

use crate::state::Position;

/// Static board oracle exposing immutable layout information.
///
/// Occupancy is runtime state and lives in [`crate::state::CombatState`];
/// the oracle only answers what never changes during a session.
pub trait BoardOracle: Send + Sync {
    fn dimensions(&self) -> GridDimensions;

    /// Whether the cell is permanently impassable (wall, pillar, pit).
    fn is_obstacle(&self, position: Position) -> bool;

    fn contains(&self, position: Position) -> bool {
        self.dimensions().contains(position)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridDimensions {
    pub width: u32,
    pub height: u32,
}

impl GridDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }
}

/// Rectangular board with an explicit obstacle set.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridBoard {
    dimensions: GridDimensions,
    obstacles: BTreeSet<Position>,
}

impl GridBoard {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            dimensions: GridDimensions::new(width, height),
            obstacles: BTreeSet::new(),
        }
    }

    pub fn with_obstacle(mut self, position: Position) -> Self {
        self.obstacles.insert(position);
        self
    }

    pub fn with_obstacles(mut self, positions: impl IntoIterator<Item = Position>) -> Self {
        self.obstacles.extend(positions);
        self
    }
}

impl BoardOracle for GridBoard {
    fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    fn is_obstacle(&self, position: Position) -> bool {
        self.obstacles.contains(&position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_exclude_negative_and_edge_overflow() {
        let board = GridBoard::new(4, 3);
        assert!(board.contains(Position::new(0, 0)));
        assert!(board.contains(Position::new(3, 2)));
        assert!(!board.contains(Position::new(4, 2)));
        assert!(!board.contains(Position::new(-1, 0)));
    }

    #[test]
    fn obstacles_are_reported() {
        let wall = Position::new(1, 1);
        let board = GridBoard::new(4, 4).with_obstacle(wall);
        assert!(board.is_obstacle(wall));
        assert!(!board.is_obstacle(Position::new(2, 1)));
    }
}
