//! Grid Evo - Path planning on a grid with a genetic algorithm.
//!
//! This crate evolves sequences of discrete moves (`up`, `down`, `left`,
//! `right`) that take an agent from a start cell to a goal cell without
//! stepping on an obstacle, preferring the shortest sequences found.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration, genome and result types
//! - `compute`: Grid model, path simulation and the evolutionary search
//!
//! # Example
//!
//! ```rust,no_run
//! use grid_evo::{
//!     schema::{GridConfig, Move},
//!     compute::{Grid, simulate},
//!     Genome,
//! };
//!
//! let grid = Grid::new(&GridConfig::default()).expect("valid grid");
//! let genome: Genome = std::iter::repeat_n(Move::Right, 9)
//!     .chain(std::iter::repeat_n(Move::Up, 9))
//!     .collect();
//!
//! let outcome = simulate(&genome, &grid);
//! println!("Ended on {:?}, goal reached: {}", outcome.position, outcome.reached_goal);
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::evolution::EvolutionEngine;
pub use compute::{Grid, SimulationOutcome, simulate, trace};
pub use schema::{EvolutionConfig, Genome, GridConfig, Move, SearchOutcome};
