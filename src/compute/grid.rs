//! Discrete arena with blocked cells.
//!
//! Occupancy is stored as a flat row-major mask (`y * width + x`).

use crate::schema::{Cell, ConfigError, GridConfig};

/// Immutable grid with start, goal and obstacle cells.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    start: Cell,
    goal: Cell,
    blocked: Vec<bool>,
}

impl Grid {
    /// Build a grid, validating the configuration first.
    pub fn new(config: &GridConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut blocked = vec![false; config.width * config.height];
        for &(x, y) in &config.obstacles {
            blocked[y * config.width + x] = true;
        }

        Ok(Self {
            width: config.width,
            height: config.height,
            start: config.start,
            goal: config.goal,
            blocked,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn goal(&self) -> Cell {
        self.goal
    }

    /// Whether `cell` lies inside the grid.
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.0 < self.width && cell.1 < self.height
    }

    /// Whether `cell` is blocked. Callers clamp to the grid first.
    pub fn is_obstacle(&self, cell: Cell) -> bool {
        debug_assert!(self.in_bounds(cell), "cell {cell:?} outside grid");
        self.in_bounds(cell) && self.blocked[cell.1 * self.width + cell.0]
    }

    pub fn is_goal(&self, cell: Cell) -> bool {
        cell == self.goal
    }

    /// Blocked cells in row-major order.
    pub fn obstacles(&self) -> impl Iterator<Item = Cell> + '_ {
        self.blocked
            .iter()
            .enumerate()
            .filter(|(_, b)| **b)
            .map(|(i, _)| (i % self.width, i / self.width))
    }

    /// Cell reached by applying `(dx, dy)` to `cell`, clamped to the grid edges.
    pub fn step(&self, cell: Cell, delta: (isize, isize)) -> Cell {
        let x = cell.0.saturating_add_signed(delta.0).min(self.width - 1);
        let y = cell.1.saturating_add_signed(delta.1).min(self.height - 1);
        (x, y)
    }
}
