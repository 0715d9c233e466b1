//! Schema module - Configuration, genome and result types for grid path search.

mod config;
mod evolution;
mod genome;

pub use config::*;
pub use evolution::*;
pub use genome::*;
