//! Evolution configuration types for genetic path search.
//!
//! This module provides types for configuring the genetic algorithm that
//! evolves move sequences across a [`GridConfig`] arena, along with the
//! progress and result types it reports.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Cell, ConfigError, Genome, GridConfig};

/// Top-level configuration for evolutionary path search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Arena the paths are evaluated against.
    #[serde(default)]
    pub grid: GridConfig,
    /// Population and generation settings.
    #[serde(default)]
    pub population: PopulationConfig,
    /// Genome constraints (initial length range).
    #[serde(default)]
    pub genome: GenomeConstraints,
    /// Selection and variation settings.
    #[serde(default)]
    pub algorithm: GeneticAlgorithmConfig,
    /// Scoring settings.
    #[serde(default)]
    pub fitness: FitnessConfig,
    /// Evaluation settings.
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

/// Population and generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Number of individuals in population.
    #[serde(default = "default_population_size")]
    pub size: usize,
    /// Generation budget. The search stops once this many generations were evaluated.
    #[serde(default = "default_max_generations")]
    pub max_generations: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: default_population_size(),
            max_generations: default_max_generations(),
        }
    }
}

fn default_population_size() -> usize {
    500
}
fn default_max_generations() -> usize {
    1000
}

/// Bounds on randomly sampled genomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenomeConstraints {
    /// Half-open `[min, max)` range for generation-0 genome lengths.
    #[serde(default = "default_length_bounds")]
    pub length_bounds: (usize, usize),
}

impl Default for GenomeConstraints {
    fn default() -> Self {
        Self {
            length_bounds: default_length_bounds(),
        }
    }
}

fn default_length_bounds() -> (usize, usize) {
    (20, 40)
}

/// Genetic Algorithm configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneticAlgorithmConfig {
    /// Mutation probability per gene (0.0-1.0).
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f32,
    /// Number of top-ranked genomes kept as parents. Defaults to half the population.
    #[serde(default)]
    pub parent_count: Option<usize>,
}

impl Default for GeneticAlgorithmConfig {
    fn default() -> Self {
        Self {
            mutation_rate: default_mutation_rate(),
            parent_count: None,
        }
    }
}

impl GeneticAlgorithmConfig {
    /// Parent pool size for a population of `population_size`.
    pub fn parents_for(&self, population_size: usize) -> usize {
        self.parent_count.unwrap_or(population_size / 2)
    }
}

fn default_mutation_rate() -> f32 {
    0.01
}

/// Scoring configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitnessConfig {
    /// Reward for reaching the goal, reduced by one per move in the genome.
    #[serde(default = "default_base_reward")]
    pub base_reward: f32,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            base_reward: default_base_reward(),
        }
    }
}

/// Largest base reward for which every integer score below it is exact in `f32`.
pub const MAX_BASE_REWARD: f32 = (1u32 << 24) as f32;

fn default_base_reward() -> f32 {
    100.0
}

/// Evaluation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Evaluate and breed across the rayon thread pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
        }
    }
}

fn default_parallel() -> bool {
    true
}

// ============================================================================
// Progress and Result Types (for external visualization)
// ============================================================================

/// State of the search driver.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SearchState {
    /// Generations are still being evaluated.
    #[default]
    Running,
    /// Some genome reached the goal.
    Success,
    /// The generation budget ran out without a solution.
    Exhausted,
}

impl SearchState {
    pub fn is_terminal(self) -> bool {
        self != SearchState::Running
    }
}

/// Progress update emitted after every generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionProgress {
    /// Index of the generation that was just evaluated.
    pub generation: usize,
    /// Generation budget.
    pub total_generations: usize,
    /// Best fitness seen so far.
    pub best_fitness: f32,
    /// Best fitness this generation.
    pub generation_best: f32,
    /// Average fitness of the evaluated generation.
    pub avg_fitness: f32,
    /// Genomes in the evaluated generation that ended on the goal.
    pub goal_reached: usize,
    /// Driver state after this step.
    pub state: SearchState,
}

/// Per-generation statistics for plotting.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EvolutionHistory {
    /// Best fitness per generation.
    pub best_fitness: Vec<f32>,
    /// Average fitness per generation.
    pub avg_fitness: Vec<f32>,
    /// Fraction of genomes ending on the goal.
    pub success_rate: Vec<f32>,
    /// Fraction of genomes stopped by an obstacle.
    pub collision_rate: Vec<f32>,
    /// Mean genome length.
    pub mean_length: Vec<f32>,
}

impl EvolutionHistory {
    pub fn len(&self) -> usize {
        self.best_fitness.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best_fitness.is_empty()
    }
}

/// A genome that reached the goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// The winning move sequence.
    pub genome: Genome,
    /// Generation it was found in.
    pub generation: usize,
    /// Its fitness score.
    pub fitness: f32,
    /// Cells visited from start to goal.
    pub path: Vec<Cell>,
}

/// How the search ended.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SearchOutcome {
    Success { solution: Solution },
    Exhausted { generations: usize },
}

impl SearchOutcome {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SearchOutcome::Success { solution } => Some(solution),
            SearchOutcome::Exhausted { .. } => None,
        }
    }

    pub fn state(&self) -> SearchState {
        match self {
            SearchOutcome::Success { .. } => SearchState::Success,
            SearchOutcome::Exhausted { .. } => SearchState::Exhausted,
        }
    }
}

/// Final result of evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionResult {
    /// Solution, or the failure indicator.
    pub outcome: SearchOutcome,
    /// Statistics from the run.
    pub stats: EvolutionStats,
    /// Full history for analysis.
    pub history: EvolutionHistory,
}

/// Statistics from evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionStats {
    /// Generations evaluated.
    pub generations: usize,
    /// Total evaluations performed.
    pub total_evaluations: u64,
    /// Best fitness achieved.
    pub best_fitness: f32,
    /// Average fitness of the last evaluated generation.
    pub final_avg_fitness: f32,
    /// Time taken (in seconds).
    pub elapsed_seconds: f64,
    /// Evaluations per second.
    pub evaluations_per_second: f64,
    /// Seed the run was driven by.
    pub seed: u64,
}

// ============================================================================
// Validation
// ============================================================================

/// Evolution configuration validation errors.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum EvolutionConfigError {
    #[error("Population size must be at least 2")]
    PopulationTooSmall,
    #[error("Mutation rate {0} must lie in [0, 1]")]
    InvalidMutationRate(f32),
    #[error("Generation budget must be positive")]
    NoGenerations,
    #[error("Invalid genome length bounds [{min}, {max})")]
    InvalidLengthBounds { min: usize, max: usize },
    #[error("Parent count {count} must be between 1 and the population size {size}")]
    InvalidParentCount { count: usize, size: usize },
    #[error("Base reward {reward} must exceed the longest genome length {max_length}")]
    RewardTooSmall { reward: f32, max_length: usize },
    #[error("Base reward {0} is too large to score genome lengths exactly")]
    RewardTooLarge(f32),
    #[error("Grid config validation failed: {0}")]
    GridError(#[from] ConfigError),
}

impl EvolutionConfig {
    /// Validate evolution configuration.
    pub fn validate(&self) -> Result<(), EvolutionConfigError> {
        self.grid.validate()?;

        let size = self.population.size;
        if size < 2 {
            return Err(EvolutionConfigError::PopulationTooSmall);
        }

        let rate = self.algorithm.mutation_rate;
        if !(0.0..=1.0).contains(&rate) {
            return Err(EvolutionConfigError::InvalidMutationRate(rate));
        }

        if self.population.max_generations == 0 {
            return Err(EvolutionConfigError::NoGenerations);
        }

        let (min, max) = self.genome.length_bounds;
        if min == 0 || min >= max {
            return Err(EvolutionConfigError::InvalidLengthBounds { min, max });
        }

        let count = self.algorithm.parents_for(size);
        if count == 0 || count > size {
            return Err(EvolutionConfigError::InvalidParentCount { count, size });
        }

        // Offspring keep the second parent's length, so the longest genome
        // ever scored is max - 1.
        let reward = self.fitness.base_reward;
        if !reward.is_finite() || reward <= max as f32 {
            return Err(EvolutionConfigError::RewardTooSmall {
                reward,
                max_length: max,
            });
        }
        if reward > MAX_BASE_REWARD {
            return Err(EvolutionConfigError::RewardTooLarge(reward));
        }

        Ok(())
    }
}

/// Errors loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Error reading config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Error parsing config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] EvolutionConfigError),
}

impl EvolutionConfig {
    /// Read, parse and validate a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_valid() {
        let config = EvolutionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.population.size, 500);
        assert_eq!(config.population.max_generations, 1000);
        assert_eq!(config.algorithm.parents_for(config.population.size), 250);
    }

    #[test]
    fn test_invalid_population() {
        let mut config = EvolutionConfig::default();
        config.population.size = 1;
        assert_eq!(
            config.validate(),
            Err(EvolutionConfigError::PopulationTooSmall)
        );
    }

    #[test]
    fn test_invalid_mutation_rate() {
        for rate in [-0.1, 1.5, f32::NAN] {
            let mut config = EvolutionConfig::default();
            config.algorithm.mutation_rate = rate;
            assert!(matches!(
                config.validate(),
                Err(EvolutionConfigError::InvalidMutationRate(_))
            ));
        }

        let mut config = EvolutionConfig::default();
        config.algorithm.mutation_rate = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_generations() {
        let mut config = EvolutionConfig::default();
        config.population.max_generations = 0;
        assert_eq!(config.validate(), Err(EvolutionConfigError::NoGenerations));
    }

    #[test]
    fn test_invalid_length_bounds() {
        for bounds in [(0, 10), (10, 10), (12, 5)] {
            let mut config = EvolutionConfig::default();
            config.genome.length_bounds = bounds;
            assert_eq!(
                config.validate(),
                Err(EvolutionConfigError::InvalidLengthBounds {
                    min: bounds.0,
                    max: bounds.1
                })
            );
        }
    }

    #[test]
    fn test_invalid_parent_count() {
        let mut config = EvolutionConfig::default();
        config.algorithm.parent_count = Some(0);
        assert!(matches!(
            config.validate(),
            Err(EvolutionConfigError::InvalidParentCount { count: 0, .. })
        ));

        config.algorithm.parent_count = Some(501);
        assert!(matches!(
            config.validate(),
            Err(EvolutionConfigError::InvalidParentCount { count: 501, .. })
        ));
    }

    #[test]
    fn test_reward_must_exceed_length() {
        let mut config = EvolutionConfig::default();
        config.fitness.base_reward = 40.0;
        assert_eq!(
            config.validate(),
            Err(EvolutionConfigError::RewardTooSmall {
                reward: 40.0,
                max_length: 40
            })
        );
    }

    #[test]
    fn test_reward_bounded_above() {
        let mut config = EvolutionConfig::default();
        config.fitness.base_reward = 1.0e9;
        assert_eq!(
            config.validate(),
            Err(EvolutionConfigError::RewardTooLarge(1.0e9))
        );

        config.fitness.base_reward = MAX_BASE_REWARD;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_grid_errors_propagate() {
        let mut config = EvolutionConfig::default();
        config.grid.obstacles.push(config.grid.goal);
        assert_eq!(
            config.validate(),
            Err(EvolutionConfigError::GridError(ConfigError::GoalBlocked(
                (9, 9)
            )))
        );
    }

    #[test]
    fn test_serialization() {
        let config = EvolutionConfig {
            random_seed: Some(7),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: EvolutionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.population.size, config.population.size);
        assert_eq!(parsed.grid, config.grid);
        assert_eq!(parsed.random_seed, Some(7));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "grid": { "width": 5, "height": 5, "start": [0, 0], "goal": [4, 4] },
            "population": { "size": 40 },
            "random_seed": 3
        }"#;
        let config: EvolutionConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.grid.obstacles, Vec::<Cell>::new());
        assert_eq!(config.population.size, 40);
        assert_eq!(config.population.max_generations, 1000);
        assert_eq!(config.genome.length_bounds, (20, 40));
        assert!(config.evaluation.parallel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = SearchOutcome::Exhausted { generations: 12 };
        let json = serde_json::to_string(&outcome).unwrap();
        assert_eq!(json, r#"{"type":"Exhausted","generations":12}"#);
        assert!(outcome.solution().is_none());
        assert_eq!(outcome.state(), SearchState::Exhausted);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = EvolutionConfig {
            population: PopulationConfig {
                size: 64,
                max_generations: 12,
            },
            random_seed: Some(99),
            ..Default::default()
        };
        fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = EvolutionConfig::load(&path).unwrap();
        assert_eq!(loaded.population.size, 64);
        assert_eq!(loaded.population.max_generations, 12);
        assert_eq!(loaded.random_seed, Some(99));
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            EvolutionConfig::load(&missing),
            Err(ConfigLoadError::Io(_))
        ));

        let garbled = dir.path().join("garbled.json");
        fs::write(&garbled, "{ not json").unwrap();
        assert!(matches!(
            EvolutionConfig::load(&garbled),
            Err(ConfigLoadError::Parse(_))
        ));

        let invalid = dir.path().join("invalid.json");
        fs::write(&invalid, r#"{ "population": { "size": 1 } }"#).unwrap();
        assert!(matches!(
            EvolutionConfig::load(&invalid),
            Err(ConfigLoadError::Invalid(
                EvolutionConfigError::PopulationTooSmall
            ))
        ));
    }
}
