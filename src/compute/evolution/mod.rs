//! Evolutionary search for paths across a grid.
//!
//! This module evolves move sequences that walk from the start cell to the
//! goal cell without touching an obstacle, preferring short sequences.
//!
//! # Overview
//!
//! The search system consists of:
//!
//! - **Fitness** (`fitness`): Scores simulated walks; only goal-reaching walks score above the failure sentinel
//! - **Genome Operations** (`genome`): Random generation, crossover, and mutation
//! - **Population** (`population`): Fixed-size generations, evaluated and bred in parallel
//! - **Selection** (`selection`): Deterministic truncation selection
//! - **Search Driver** (`search`): Generation loop with success and budget termination
//!
//! # Example
//!
//! ```rust,no_run
//! use grid_evo::schema::EvolutionConfig;
//! use grid_evo::compute::evolution::EvolutionEngine;
//!
//! let config = EvolutionConfig {
//!     random_seed: Some(42),
//!     ..Default::default()
//! };
//!
//! let mut engine = EvolutionEngine::new(config).expect("valid config");
//! let result = engine.run_with_callback(|progress| {
//!     println!("Generation {}: best fitness = {:.1}",
//!         progress.generation, progress.generation_best);
//! });
//!
//! match result.outcome.solution() {
//!     Some(solution) => println!("Found {} moves in generation {}",
//!         solution.genome.len(), solution.generation),
//!     None => println!("No path within the generation budget"),
//! }
//! ```

mod fitness;
mod genome;
mod population;
mod search;
mod selection;

pub use fitness::{Evaluation, FAILURE_SCORE, FitnessEvaluator, is_success};
pub use genome::GenomeRng;
pub use population::Population;
pub use search::{EvolutionEngine, verify_solution};
pub use selection::{rank_indices, select_parents};
