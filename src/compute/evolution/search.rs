//! Evolution driver for genetic path search.

use std::time::Instant;

use log::{debug, info};

use crate::compute::grid::Grid;
use crate::compute::simulation::trace;
use crate::schema::{
    EvolutionConfig, EvolutionConfigError, EvolutionHistory, EvolutionProgress, EvolutionResult,
    EvolutionStats, Genome, SearchOutcome, SearchState, Solution,
};

use super::fitness::{Evaluation, FitnessEvaluator, is_success};
use super::genome::GenomeRng;
use super::population::Population;
use super::selection::select_parents;

/// Evolution engine that runs the search.
pub struct EvolutionEngine {
    config: EvolutionConfig,
    grid: Grid,
    evaluator: FitnessEvaluator,
    rng: GenomeRng,
    seed: u64,
    population: Population,
    history: EvolutionHistory,
    generation: usize,
    best_fitness: f32,
    state: SearchState,
    solution: Option<Solution>,
    last_progress: Option<EvolutionProgress>,
}

impl EvolutionEngine {
    /// Create a new evolution engine with a freshly sampled population.
    ///
    /// The configuration is validated here, before any generation runs.
    pub fn new(config: EvolutionConfig) -> Result<Self, EvolutionConfigError> {
        config.validate()?;

        let grid = Grid::new(&config.grid)?;
        let seed = config.random_seed.unwrap_or_else(rand::random);
        let evaluator = FitnessEvaluator::new(config.fitness.clone());

        let mut engine = Self {
            config,
            grid,
            evaluator,
            rng: GenomeRng::new(seed),
            seed,
            population: Population::default(),
            history: EvolutionHistory::default(),
            generation: 0,
            best_fitness: f32::NEG_INFINITY,
            state: SearchState::Running,
            solution: None,
            last_progress: None,
        };
        engine.initialize();
        Ok(engine)
    }

    /// Reset to generation 0 with a new random population.
    ///
    /// The random stream continues from where it was, so a reset run explores
    /// different genomes than the first one.
    pub fn initialize(&mut self) {
        self.population = Population::random(
            self.config.population.size,
            &self.config.genome,
            &mut self.rng,
        );
        self.history = EvolutionHistory::default();
        self.generation = 0;
        self.best_fitness = f32::NEG_INFINITY;
        self.state = SearchState::Running;
        self.solution = None;
        self.last_progress = None;
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn history(&self) -> &EvolutionHistory {
        &self.history
    }

    /// Index of the current generation. Equals the budget once exhausted.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    /// Seed driving this run.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Evaluate the current generation, then either stop or breed the next.
    ///
    /// On success or exhaustion the evaluated generation stays in place and
    /// further calls do nothing.
    pub fn step(&mut self) -> SearchState {
        if self.state.is_terminal() {
            return self.state;
        }

        let parallel = self.config.evaluation.parallel;
        let evaluations = self.population.evaluate(&self.evaluator, &self.grid, parallel);
        let progress = self.record(&evaluations);

        if let Some(index) = best_success(&evaluations) {
            let genome = self.population.genomes()[index].clone();
            info!(
                "Generation {}: genome {} reached the goal in {} moves (fitness {:.1})",
                self.generation,
                index,
                genome.len(),
                evaluations[index].fitness
            );
            self.solution = Some(Solution {
                path: trace(&genome, &self.grid),
                fitness: evaluations[index].fitness,
                generation: self.generation,
                genome,
            });
            return self.finish(progress, SearchState::Success);
        }

        self.generation += 1;
        if self.generation >= self.config.population.max_generations {
            info!(
                "No path found after {} generations (best fitness {:.1})",
                self.generation, self.best_fitness
            );
            return self.finish(progress, SearchState::Exhausted);
        }

        let scores: Vec<f32> = evaluations.iter().map(|e| e.fitness).collect();
        let k = self.config.algorithm.parents_for(self.population.len());
        let parents = select_parents(self.population.genomes(), &scores, k);

        self.population = Population::breed(
            &parents,
            self.config.population.size,
            self.config.algorithm.mutation_rate,
            &mut self.rng,
            parallel,
        );

        self.last_progress = Some(progress);
        self.state
    }

    fn finish(&mut self, mut progress: EvolutionProgress, state: SearchState) -> SearchState {
        self.state = state;
        progress.state = state;
        self.last_progress = Some(progress);
        state
    }

    /// Append statistics for an evaluated generation.
    fn record(&mut self, evaluations: &[Evaluation]) -> EvolutionProgress {
        let count = evaluations.len().max(1) as f32;
        let gen_best = evaluations
            .iter()
            .map(|e| e.fitness)
            .fold(f32::NEG_INFINITY, f32::max);
        let avg_fitness = evaluations.iter().map(|e| e.fitness).sum::<f32>() / count;
        let goal_reached = evaluations
            .iter()
            .filter(|e| e.outcome.reached_goal)
            .count();
        let collisions = evaluations
            .iter()
            .filter(|e| e.outcome.hit_obstacle)
            .count();

        self.best_fitness = self.best_fitness.max(gen_best);

        self.history.best_fitness.push(gen_best);
        self.history.avg_fitness.push(avg_fitness);
        self.history.success_rate.push(goal_reached as f32 / count);
        self.history.collision_rate.push(collisions as f32 / count);
        self.history.mean_length.push(self.population.mean_length());

        debug!(
            "Generation {}: best = {:.1}, avg = {:.3}, collisions = {}, goal = {}",
            self.generation, gen_best, avg_fitness, collisions, goal_reached
        );

        EvolutionProgress {
            generation: self.generation,
            total_generations: self.config.population.max_generations,
            best_fitness: self.best_fitness,
            generation_best: gen_best,
            avg_fitness,
            goal_reached,
            state: self.state,
        }
    }

    /// Progress of the most recently evaluated generation.
    pub fn progress(&self) -> Option<&EvolutionProgress> {
        self.last_progress.as_ref()
    }

    /// Run evolution with progress callback.
    pub fn run_with_callback<F>(&mut self, callback: F) -> EvolutionResult
    where
        F: Fn(&EvolutionProgress),
    {
        let start_time = Instant::now();
        info!(
            "Searching {}x{} grid from {:?} to {:?}: population {}, budget {}, seed {}",
            self.grid.width(),
            self.grid.height(),
            self.grid.start(),
            self.grid.goal(),
            self.config.population.size,
            self.config.population.max_generations,
            self.seed
        );

        loop {
            let state = self.step();
            if let Some(progress) = &self.last_progress {
                callback(progress);
            }
            if state.is_terminal() {
                break;
            }
        }

        let elapsed = start_time.elapsed().as_secs_f64();
        let generations = self.history.len();
        let total_evaluations = generations as u64 * self.config.population.size as u64;

        let outcome = match &self.solution {
            Some(solution) => SearchOutcome::Success {
                solution: solution.clone(),
            },
            None => SearchOutcome::Exhausted { generations },
        };

        EvolutionResult {
            outcome,
            stats: EvolutionStats {
                generations,
                total_evaluations,
                best_fitness: self.best_fitness,
                final_avg_fitness: self.history.avg_fitness.last().copied().unwrap_or(0.0),
                elapsed_seconds: elapsed,
                evaluations_per_second: total_evaluations as f64 / elapsed.max(1e-9),
                seed: self.seed,
            },
            history: self.history.clone(),
        }
    }

    /// Run evolution (blocking).
    pub fn run(&mut self) -> EvolutionResult {
        self.run_with_callback(|_| {})
    }
}

/// Index of the highest-scoring genome that reached the goal, earliest on ties.
fn best_success(evaluations: &[Evaluation]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, e) in evaluations.iter().enumerate() {
        if !e.outcome.reached_goal || !is_success(e.fitness) {
            continue;
        }
        if best.is_none_or(|b| e.fitness > evaluations[b].fitness) {
            best = Some(i);
        }
    }
    best
}

/// Replay a genome and check it ends on the goal without touching an obstacle.
pub fn verify_solution(genome: &Genome, grid: &Grid) -> bool {
    let path = trace(genome, grid);
    path.len() == genome.len() + 1
        && path.iter().all(|&c| !grid.is_obstacle(c))
        && path.last().is_some_and(|&c| grid.is_goal(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::simulation::SimulationOutcome;
    use crate::schema::{GridConfig, Move, PopulationConfig};
    use std::cell::RefCell;

    fn small_config(size: usize, max_generations: usize) -> EvolutionConfig {
        EvolutionConfig {
            population: PopulationConfig {
                size,
                max_generations,
            },
            random_seed: Some(42),
            ..Default::default()
        }
    }

    /// Default arena with the goal walled off.
    fn sealed_goal_config(size: usize, max_generations: usize) -> EvolutionConfig {
        let mut config = small_config(size, max_generations);
        config.grid.obstacles.extend([(8, 9), (9, 8)]);
        config
    }

    #[test]
    fn test_evolution_engine_creation() {
        let engine = EvolutionEngine::new(small_config(10, 5)).unwrap();

        assert_eq!(engine.population().len(), 10);
        assert_eq!(engine.generation(), 0);
        assert_eq!(engine.state(), SearchState::Running);
        assert_eq!(engine.seed(), 42);
        assert!(engine.progress().is_none());
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let mut config = small_config(10, 5);
        config.grid.obstacles.push((0, 0));
        assert!(matches!(
            EvolutionEngine::new(config),
            Err(EvolutionConfigError::GridError(_))
        ));

        let mut config = small_config(10, 5);
        config.algorithm.mutation_rate = 2.0;
        assert!(EvolutionEngine::new(config).is_err());
    }

    #[test]
    fn test_finds_path_on_default_grid() {
        let config = EvolutionConfig {
            random_seed: Some(2024),
            ..Default::default()
        };
        let mut engine = EvolutionEngine::new(config).unwrap();
        let result = engine.run();

        assert_eq!(result.outcome.state(), SearchState::Success);
        let solution = result.outcome.solution().unwrap();
        let grid = engine.grid();
        assert!(verify_solution(&solution.genome, grid));
        assert_eq!(solution.path.first(), Some(&(0, 0)));
        assert_eq!(solution.path.last(), Some(&(9, 9)));
        assert!(solution.path.iter().all(|&c| !grid.is_obstacle(c)));
        assert_eq!(solution.fitness, 100.0 - solution.genome.len() as f32);
        assert!(solution.generation < 1000);
        assert_eq!(result.stats.generations, solution.generation + 1);
        assert_eq!(result.history.len(), solution.generation + 1);
        assert_eq!(result.stats.seed, 2024);
    }

    #[test]
    fn test_unreachable_goal_exhausts_budget() {
        let mut engine = EvolutionEngine::new(sealed_goal_config(60, 25)).unwrap();
        let result = engine.run();

        assert!(result.outcome.solution().is_none());
        assert!(matches!(
            result.outcome,
            SearchOutcome::Exhausted { generations: 25 }
        ));
        assert_eq!(engine.state(), SearchState::Exhausted);
        assert_eq!(engine.generation(), 25);
        assert_eq!(result.stats.generations, 25);
        assert_eq!(result.stats.total_evaluations, 25 * 60);
        assert_eq!(result.history.len(), 25);
        assert!(result.history.best_fitness.iter().all(|&f| f == -1.0));
        assert!(result.history.success_rate.iter().all(|&r| r == 0.0));
    }

    #[test]
    fn test_population_size_invariant() {
        let mut engine = EvolutionEngine::new(sealed_goal_config(31, 10)).unwrap();
        while !engine.step().is_terminal() {
            assert_eq!(engine.population().len(), 31);
        }
        assert_eq!(engine.population().len(), 31);
    }

    #[test]
    fn test_terminal_state_is_sticky() {
        let mut engine = EvolutionEngine::new(sealed_goal_config(10, 2)).unwrap();
        assert_eq!(engine.step(), SearchState::Running);
        assert_eq!(engine.step(), SearchState::Exhausted);

        let before = engine.population().genomes().to_vec();
        assert_eq!(engine.step(), SearchState::Exhausted);
        assert_eq!(engine.generation(), 2);
        assert_eq!(engine.history().len(), 2);
        assert_eq!(engine.population().genomes(), &before[..]);
    }

    #[test]
    fn test_progress_callback() {
        let seen = RefCell::new(Vec::new());
        let mut engine = EvolutionEngine::new(sealed_goal_config(20, 6)).unwrap();
        engine.run_with_callback(|p| seen.borrow_mut().push((p.generation, p.state)));

        let seen = seen.into_inner();
        assert_eq!(seen.len(), 6);
        assert_eq!(seen[0], (0, SearchState::Running));
        assert_eq!(seen[5], (5, SearchState::Exhausted));
        assert!(seen.windows(2).all(|w| w[1].0 == w[0].0 + 1));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let run = |parallel: bool| {
            let mut config = sealed_goal_config(40, 8);
            config.algorithm.mutation_rate = 0.05;
            config.evaluation.parallel = parallel;
            let mut engine = EvolutionEngine::new(config).unwrap();
            engine.run();
            (engine.population().genomes().to_vec(), engine.history().clone())
        };

        let (par_pop, par_hist) = run(true);
        let (seq_pop, seq_hist) = run(false);
        assert_eq!(par_pop, seq_pop);
        assert_eq!(par_hist.avg_fitness, seq_hist.avg_fitness);
        assert_eq!(par_hist.mean_length, seq_hist.mean_length);
    }

    #[test]
    fn test_same_seed_same_run() {
        let run = || {
            let mut engine = EvolutionEngine::new(sealed_goal_config(30, 5)).unwrap();
            engine.run();
            engine.population().genomes().to_vec()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_reset_restarts_at_generation_zero() {
        let mut engine = EvolutionEngine::new(sealed_goal_config(12, 3)).unwrap();
        engine.run();
        assert_eq!(engine.state(), SearchState::Exhausted);

        engine.initialize();
        assert_eq!(engine.state(), SearchState::Running);
        assert_eq!(engine.generation(), 0);
        assert!(engine.history().is_empty());
        assert_eq!(engine.population().len(), 12);
    }

    #[test]
    fn test_immediate_success_on_open_grid() {
        // 2x1 corridor: a genome whose last horizontal move is Right ends on the
        // goal, so generation 0 contains a winner.
        let mut config = small_config(50, 10);
        config.grid = GridConfig::open(2, 1);
        let mut engine = EvolutionEngine::new(config).unwrap();

        assert_eq!(engine.step(), SearchState::Success);
        let solution = engine.solution().unwrap();
        assert_eq!(solution.generation, 0);
        assert!(verify_solution(&solution.genome, engine.grid()));
    }

    #[test]
    fn test_best_success_prefers_shortest_then_earliest() {
        let eval = |reached_goal: bool, fitness: f32| Evaluation {
            outcome: SimulationOutcome {
                position: (0, 0),
                hit_obstacle: false,
                reached_goal,
                steps_taken: 0,
            },
            fitness,
        };
        let evaluations = [
            eval(false, -1.0),
            eval(true, 70.0),
            eval(true, 75.0),
            eval(true, 75.0),
        ];
        assert_eq!(best_success(&evaluations), Some(2));
        assert_eq!(best_success(&evaluations[..1]), None);
    }

    #[test]
    fn test_verify_solution() {
        let grid = Grid::new(&GridConfig::default()).unwrap();
        let around: Genome = std::iter::repeat_n(Move::Right, 9)
            .chain(std::iter::repeat_n(Move::Up, 9))
            .collect();
        assert!(verify_solution(&around, &grid));

        let through: Genome = std::iter::repeat_n(Move::Up, 3)
            .chain(std::iter::repeat_n(Move::Right, 9))
            .chain(std::iter::repeat_n(Move::Up, 6))
            .collect();
        assert!(!verify_solution(&through, &grid));
    }
}
