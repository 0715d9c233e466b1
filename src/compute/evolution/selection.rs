//! Truncation selection.

use crate::schema::Genome;

/// Indices of the `k` highest-scoring genomes, best first.
///
/// The sort is stable, so equal scores keep population order.
pub fn rank_indices(scores: &[f32], k: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    order.truncate(k);
    order
}

/// Return the `k` highest-scoring genomes. `k` is clamped to the population size.
pub fn select_parents(genomes: &[Genome], scores: &[f32], k: usize) -> Vec<Genome> {
    debug_assert_eq!(genomes.len(), scores.len());
    rank_indices(scores, k)
        .into_iter()
        .map(|i| genomes[i].clone())
        .collect()
}
