//! Fixed-size genome populations.
//!
//! A population is never edited in place. Each generation is built whole from
//! the parents of the previous one.

use rayon::prelude::*;

use super::fitness::{Evaluation, FitnessEvaluator};
use super::genome::GenomeRng;
use crate::compute::grid::Grid;
use crate::schema::{Genome, GenomeConstraints};

/// An indexed collection of genomes.
#[derive(Debug, Clone, Default)]
pub struct Population {
    genomes: Vec<Genome>,
}

impl Population {
    /// Sample `size` independent random genomes.
    pub fn random(size: usize, constraints: &GenomeConstraints, rng: &mut GenomeRng) -> Self {
        let genomes = (0..size).map(|_| rng.random_genome(constraints)).collect();
        Self { genomes }
    }

    /// Breed `size` offspring from `parents`.
    ///
    /// Each child draws from its own stream seeded by `rng`, so the result is
    /// the same whether children are built in parallel or not.
    pub fn breed(
        parents: &[Genome],
        size: usize,
        mutation_rate: f32,
        rng: &mut GenomeRng,
        parallel: bool,
    ) -> Self {
        debug_assert!(!parents.is_empty());
        let seeds: Vec<u64> = (0..size).map(|_| rng.next_seed()).collect();
        let child = |&seed: &u64| GenomeRng::new(seed).offspring(parents, mutation_rate);

        let genomes = if parallel {
            seeds.par_iter().map(child).collect()
        } else {
            seeds.iter().map(child).collect()
        };
        Self { genomes }
    }

    /// Score every genome, in index order.
    pub fn evaluate(
        &self,
        evaluator: &FitnessEvaluator,
        grid: &Grid,
        parallel: bool,
    ) -> Vec<Evaluation> {
        if parallel {
            self.genomes
                .par_iter()
                .map(|g| evaluator.evaluate(g, grid))
                .collect()
        } else {
            self.genomes
                .iter()
                .map(|g| evaluator.evaluate(g, grid))
                .collect()
        }
    }

    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    pub fn get(&self, index: usize) -> Option<&Genome> {
        self.genomes.get(index)
    }

    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    /// Mean genome length.
    pub fn mean_length(&self) -> f32 {
        if self.genomes.is_empty() {
            return 0.0;
        }
        self.genomes.iter().map(Genome::len).sum::<usize>() as f32 / self.genomes.len() as f32
    }
}

impl From<Vec<Genome>> for Population {
    fn from(genomes: Vec<Genome>) -> Self {
        Self { genomes }
    }
}
