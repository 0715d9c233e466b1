//! Genome manipulation utilities for evolutionary search.
//!
//! Provides random generation, crossover, and mutation operations.

use crate::schema::{Genome, GenomeConstraints, Move};
use rand::prelude::*;

/// Random number generator wrapper for genome operations.
pub struct GenomeRng {
    rng: StdRng,
}

impl GenomeRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniformly random move.
    pub fn random_move(&mut self) -> Move {
        Move::ALL[self.rng.gen_range(0..Move::ALL.len())]
    }

    /// Generate a random genome within constraints.
    pub fn random_genome(&mut self, constraints: &GenomeConstraints) -> Genome {
        let (min, max) = constraints.length_bounds;
        let len = self.rng.gen_range(min..max);
        (0..len).map(|_| self.random_move()).collect()
    }

    /// Single-point crossover: `parent1[..point] ++ parent2[point..]`.
    ///
    /// The point is drawn from `[1, min(len1, len2))`, so the child always has
    /// the second parent's length. Parents too short to split yield a copy of
    /// `parent2`.
    pub fn crossover(&mut self, parent1: &Genome, parent2: &Genome) -> Genome {
        let len = parent1.len().min(parent2.len());
        if len < 2 {
            return parent2.clone();
        }

        let point = self.rng.gen_range(1..len);
        parent1.moves()[..point]
            .iter()
            .chain(&parent2.moves()[point..])
            .copied()
            .collect()
    }

    /// Resample each gene with probability `rate`. Length is unchanged.
    pub fn mutate(&mut self, genome: &mut Genome, rate: f32) {
        for gene in genome.moves_mut() {
            if self.rng.r#gen::<f32>() < rate {
                *gene = self.random_move();
            }
        }
    }

    /// Indices of two parents drawn from a pool of `pool` entries.
    ///
    /// The two indices differ unless the pool holds a single parent.
    pub fn choose_pair(&mut self, pool: usize) -> (usize, usize) {
        debug_assert!(pool > 0);
        if pool < 2 {
            return (0, 0);
        }
        let first = self.rng.gen_range(0..pool);
        let mut second = self.rng.gen_range(0..pool - 1);
        if second >= first {
            second += 1;
        }
        (first, second)
    }

    /// Produce one child from a random pair of `parents`.
    pub fn offspring(&mut self, parents: &[Genome], mutation_rate: f32) -> Genome {
        let (a, b) = self.choose_pair(parents.len());
        let mut child = self.crossover(&parents[a], &parents[b]);
        self.mutate(&mut child, mutation_rate);
        child
    }

    /// Generate next u64 for seeding child RNGs.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.r#gen()
    }
}
