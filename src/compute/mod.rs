//! Compute module - Grid model, path simulation and evolutionary search.

mod grid;
mod simulation;

pub mod evolution;

pub use grid::*;
pub use simulation::*;
