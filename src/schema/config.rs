//! Configuration types for the grid arena.

use serde::{Deserialize, Serialize};

/// A grid cell as `(x, y)`. `x` grows to the right, `y` grows upward.
pub type Cell = (usize, usize);

/// Largest number of cells a grid may hold.
pub const MAX_CELLS: usize = 1 << 24;

/// Arena layout: dimensions, endpoints and blocked cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Grid width in cells (X dimension).
    pub width: usize,
    /// Grid height in cells (Y dimension).
    pub height: usize,
    /// Cell the agent starts from.
    pub start: Cell,
    /// Cell the agent has to end on.
    pub goal: Cell,
    /// Blocked cells.
    #[serde(default)]
    pub obstacles: Vec<Cell>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            start: (0, 0),
            goal: (9, 9),
            obstacles: vec![(3, 3), (3, 4), (4, 4), (4, 3), (5, 5), (6, 5), (5, 6)],
        }
    }
}

impl GridConfig {
    /// Obstacle-free grid of the given size with start and goal in opposite corners.
    pub fn open(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            start: (0, 0),
            goal: (width.saturating_sub(1), height.saturating_sub(1)),
            obstacles: Vec::new(),
        }
    }

    fn contains(&self, cell: Cell) -> bool {
        cell.0 < self.width && cell.1 < self.height
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cells = self.width.checked_mul(self.height);
        if self.width == 0 || self.height == 0 || cells.is_none_or(|n| n > MAX_CELLS) {
            return Err(ConfigError::InvalidDimensions);
        }
        if !self.contains(self.start) {
            return Err(ConfigError::OutOfBounds {
                what: "start",
                cell: self.start,
            });
        }
        if !self.contains(self.goal) {
            return Err(ConfigError::OutOfBounds {
                what: "goal",
                cell: self.goal,
            });
        }
        for &cell in &self.obstacles {
            if !self.contains(cell) {
                return Err(ConfigError::OutOfBounds {
                    what: "obstacle",
                    cell,
                });
            }
            if cell == self.start {
                return Err(ConfigError::StartBlocked(cell));
            }
            if cell == self.goal {
                return Err(ConfigError::GoalBlocked(cell));
            }
        }
        Ok(())
    }
}

/// Grid configuration errors.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid dimensions (width, height) must be non-zero and hold at most {} cells", MAX_CELLS)]
    InvalidDimensions,
    #[error("{what} cell {cell:?} lies outside the grid")]
    OutOfBounds { what: &'static str, cell: Cell },
    #[error("Start cell {0:?} is an obstacle")]
    StartBlocked(Cell),
    #[error("Goal cell {0:?} is an obstacle")]
    GoalBlocked(Cell),
}
