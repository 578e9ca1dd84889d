//! Snapshot and configuration file round-trips.

use std::path::PathBuf;

use neat_engine::{Config, Error, Population};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

fn temp_path(tag: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("neat_{tag}_{}", Uuid::new_v4()));
    path
}

fn evaluated_population(seed: u64) -> Population<ChaCha8Rng> {
    let config = Config {
        population_size: 6,
        num_inputs: 2,
        num_outputs: 1,
        ..Config::default()
    };
    let mut population = Population::new(config, ChaCha8Rng::seed_from_u64(seed));
    population.run(
        |genomes| {
            for genome in genomes.iter_mut() {
                genome.fitness = genome.genome_id as f64;
            }
        },
        2,
    );
    population
}

#[test]
fn population_round_trips_through_a_snapshot() {
    let path = temp_path("roundtrip");
    let population = evaluated_population(80);
    population.save(&path).unwrap();

    let restored = Population::load(&path, ChaCha8Rng::seed_from_u64(81)).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(restored.genomes().len(), population.genomes().len());
    assert_eq!(
        restored.config().population_size,
        population.config().population_size
    );
    let restored_ids: Vec<u32> = restored.genomes().iter().map(|g| g.genome_id).collect();
    let original_ids: Vec<u32> = population.genomes().iter().map(|g| g.genome_id).collect();
    assert_eq!(restored_ids, original_ids);
    assert_eq!(
        restored.best_genome().map(|g| g.genome_id),
        population.best_genome().map(|g| g.genome_id)
    );
}

#[test]
fn resumed_runs_keep_allocating_fresh_genome_ids() {
    let path = temp_path("resume");
    let population = evaluated_population(82);
    let max_id = population
        .genomes()
        .iter()
        .map(|g| g.genome_id)
        .max()
        .unwrap();
    population.save(&path).unwrap();

    let mut restored = Population::load(&path, ChaCha8Rng::seed_from_u64(83)).unwrap();
    std::fs::remove_file(&path).unwrap();

    restored.run(
        |genomes| {
            for genome in genomes.iter_mut() {
                genome.fitness = 1.0;
            }
        },
        1,
    );
    for genome in restored.genomes() {
        assert!(genome.genome_id > max_id, "recycled id {}", genome.genome_id);
    }
}

#[test]
fn loading_a_missing_snapshot_is_an_io_failure() {
    let path = temp_path("missing");
    let result = Population::load(&path, ChaCha8Rng::seed_from_u64(84));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn loading_garbage_is_an_invalid_argument() {
    let path = temp_path("garbage");
    std::fs::write(&path, "definitely not a snapshot").unwrap();
    let result = Population::load(&path, ChaCha8Rng::seed_from_u64(85));
    std::fs::remove_file(&path).unwrap();
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}

#[test]
fn config_files_round_trip() {
    let path = temp_path("config");
    let config = Config {
        population_size: 24,
        survival_threshold: 0.4,
        num_inputs: 5,
        ..Config::default()
    };
    config.save(&path).unwrap();

    let reloaded = Config::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(reloaded.population_size, 24);
    assert_eq!(reloaded.survival_threshold, 0.4);
    assert_eq!(reloaded.num_inputs, 5);
    assert_eq!(reloaded.max_generations, config.max_generations);
}
