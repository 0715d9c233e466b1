//! Fitness scoring for simulated paths.
//!
//! Any failure scores [`FAILURE_SCORE`]. A path that ends on the goal scores
//! `base_reward - length`, so shorter successful paths always rank higher.
//! There is no partial credit for ending near the goal.

use serde::{Deserialize, Serialize};

use crate::compute::grid::Grid;
use crate::compute::simulation::{SimulationOutcome, simulate};
use crate::schema::{FitnessConfig, Genome};

/// Score given to paths that collide or end away from the goal.
pub const FAILURE_SCORE: f32 = -1.0;

/// Scores simulated outcomes.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    config: FitnessConfig,
}

/// Simulation outcome paired with its score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub outcome: SimulationOutcome,
    pub fitness: f32,
}

impl FitnessEvaluator {
    /// Create a new fitness evaluator.
    pub fn new(config: FitnessConfig) -> Self {
        Self { config }
    }

    pub fn base_reward(&self) -> f32 {
        self.config.base_reward
    }

    /// Score an outcome produced by a genome of `genome_length` moves.
    pub fn score(&self, outcome: &SimulationOutcome, genome_length: usize) -> f32 {
        if outcome.hit_obstacle || !outcome.reached_goal {
            return FAILURE_SCORE;
        }
        self.config.base_reward - genome_length as f32
    }

    /// Simulate `genome` on `grid` and score the result.
    pub fn evaluate(&self, genome: &Genome, grid: &Grid) -> Evaluation {
        let outcome = simulate(genome, grid);
        Evaluation {
            outcome,
            fitness: self.score(&outcome, genome.len()),
        }
    }
}

/// Whether `fitness` can only come from a path that reached the goal.
pub fn is_success(fitness: f32) -> bool {
    fitness > FAILURE_SCORE
}
