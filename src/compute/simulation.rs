//! Executes move sequences against a grid.

use serde::{Deserialize, Serialize};

use super::grid::Grid;
use crate::schema::{Cell, Genome};

/// Result of walking a genome from the start cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    /// Cell the walk ended on (the colliding cell if an obstacle was hit).
    pub position: Cell,
    /// The walk stopped on an obstacle.
    pub hit_obstacle: bool,
    /// The walk finished on the goal without colliding.
    pub reached_goal: bool,
    /// Moves processed before stopping.
    pub steps_taken: usize,
}

/// Walk `genome` from the grid's start cell.
///
/// Moves into a wall leave the position unchanged. The walk stops at the
/// first obstacle and ignores the remaining moves.
pub fn simulate(genome: &Genome, grid: &Grid) -> SimulationOutcome {
    let mut position = grid.start();

    for (i, m) in genome.moves().iter().enumerate() {
        position = grid.step(position, m.delta());
        if grid.is_obstacle(position) {
            return SimulationOutcome {
                position,
                hit_obstacle: true,
                reached_goal: false,
                steps_taken: i + 1,
            };
        }
    }

    SimulationOutcome {
        position,
        hit_obstacle: false,
        reached_goal: grid.is_goal(position),
        steps_taken: genome.len(),
    }
}

/// Cells occupied while walking `genome`, beginning with the start cell.
///
/// One entry follows per processed move, so a collision ends the trace on the
/// obstacle cell.
pub fn trace(genome: &Genome, grid: &Grid) -> Vec<Cell> {
    let mut position = grid.start();
    let mut path = Vec::with_capacity(genome.len() + 1);
    path.push(position);

    for m in genome.moves() {
        position = grid.step(position, m.delta());
        path.push(position);
        if grid.is_obstacle(position) {
            break;
        }
    }

    path
}
