//! Grid Evo CLI - Run a path search from JSON configuration.

use std::fs;
use std::path::PathBuf;

use grid_evo::{EvolutionConfig, EvolutionEngine, SearchOutcome};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [result.json]", args[0]);
        eprintln!();
        eprintln!("Evolve a path across a grid from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to evolution configuration file");
        eprintln!("  result.json  Optional path to write the full result to");
        eprintln!();
        eprintln!("Example configuration is printed with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let output_path = args.get(2).map(PathBuf::from);

    // Load configuration
    let config = EvolutionConfig::load(&config_path).unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    });

    let mut engine = EvolutionEngine::new(config).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    });

    let grid = engine.grid();
    let total = engine.config().population.max_generations;
    println!("Grid Evo Path Search");
    println!("====================");
    println!("Grid: {}x{}", grid.width(), grid.height());
    println!("Start: {:?}  Goal: {:?}", grid.start(), grid.goal());
    println!("Obstacles: {}", grid.obstacles().count());
    println!("Population: {}", engine.config().population.size);
    println!("Generations: {}", total);
    println!("Seed: {}", engine.seed());
    println!();

    // Print progress every 10%
    let interval = (total / 10).max(1);
    let result = engine.run_with_callback(|progress| {
        if (progress.generation + 1) % interval == 0 || progress.state.is_terminal() {
            println!(
                "  Generation {}/{}: best={:.1}, avg={:.3}, at goal={}",
                progress.generation + 1,
                progress.total_generations,
                progress.generation_best,
                progress.avg_fitness,
                progress.goal_reached
            );
        }
    });

    println!();
    match &result.outcome {
        SearchOutcome::Success { solution } => {
            println!(
                "Found a path in generation {} ({} moves, fitness {:.1})",
                solution.generation,
                solution.genome.len(),
                solution.fitness
            );
            println!("Moves: {}", serde_json::to_string(&solution.genome).unwrap_or_default());
            println!("Path: {:?}", solution.path);
        }
        SearchOutcome::Exhausted { generations } => {
            println!("Failed to find a path in {} generations.", generations);
        }
    }
    println!(
        "Time: {:.2}s ({:.0} evaluations/s)",
        result.stats.elapsed_seconds, result.stats.evaluations_per_second
    );

    if let Some(path) = output_path {
        let json = serde_json::to_string_pretty(&result).unwrap_or_else(|e| {
            eprintln!("Error serializing result: {}", e);
            std::process::exit(1);
        });
        fs::write(&path, json).unwrap_or_else(|e| {
            eprintln!("Error writing result file: {}", e);
            std::process::exit(1);
        });
        println!("Result written to {}", path.display());
    }

    if result.outcome.solution().is_none() {
        std::process::exit(2);
    }
}

fn print_example_config() {
    let config = EvolutionConfig {
        random_seed: Some(42),
        ..Default::default()
    };

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}
