//! Generational loop behavior over small, fully controlled populations.

use neat_engine::{Config, FeedForwardNetwork, Population, FITNESS_NOT_COMPUTED};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn tiny_config() -> Config {
    Config {
        population_size: 4,
        survival_threshold: 0.5,
        num_inputs: 2,
        num_outputs: 2,
        ..Config::default()
    }
}

#[test]
fn generation_zero_is_seeded_and_unevaluated() {
    let population = Population::new(tiny_config(), ChaCha8Rng::seed_from_u64(70));
    assert_eq!(population.genomes().len(), 4);
    assert!(population.best_genome().is_none());
    for genome in population.genomes() {
        assert_eq!(genome.fitness, FITNESS_NOT_COMPUTED);
        assert_eq!(genome.neurons().len(), 4);
        assert_eq!(genome.links().len(), 4);
    }
}

#[test]
fn one_generation_breeds_fresh_ids_from_the_top_half() {
    // Fitness equals the genome id, so the breeding pool is the top-2 ids
    // and every offspring id exceeds everything in generation zero.
    let mut population = Population::new(tiny_config(), ChaCha8Rng::seed_from_u64(71));

    population.run(
        |genomes| {
            for genome in genomes.iter_mut() {
                genome.fitness = genome.genome_id as f64;
            }
        },
        1,
    );

    assert_eq!(population.genomes().len(), 4);
    for genome in population.genomes() {
        assert!(genome.genome_id > 3, "stale id {}", genome.genome_id);
    }
    assert_eq!(population.best_genome().unwrap().genome_id, 3);
    assert_eq!(population.best_genome().unwrap().fitness, 3.0);
}

#[test]
fn population_size_is_stable_across_generations() {
    let mut population = Population::new(tiny_config(), ChaCha8Rng::seed_from_u64(72));
    for _ in 0..5 {
        population.run(
            |genomes| {
                for genome in genomes.iter_mut() {
                    genome.fitness = genome.links().len() as f64;
                }
            },
            1,
        );
        assert_eq!(population.genomes().len(), 4);
    }
}

#[test]
fn best_genome_is_a_copy_that_survives_culling() {
    let mut population = Population::new(tiny_config(), ChaCha8Rng::seed_from_u64(73));

    population.run(
        |genomes| {
            for genome in genomes.iter_mut() {
                genome.fitness = genome.genome_id as f64;
            }
        },
        1,
    );
    let recorded = population.best_genome().unwrap().genome_id;

    // The recorded champion is long gone from the breeding population, yet
    // the copy remains intact and evaluable.
    population.run(
        |genomes| {
            for genome in genomes.iter_mut() {
                genome.fitness = 0.0;
            }
        },
        3,
    );
    let best = population.best_genome().unwrap();
    assert_eq!(best.genome_id, recorded);
    let network = FeedForwardNetwork::from_genome(best).unwrap();
    assert_eq!(network.activate(&[0.0, 0.0]).unwrap().len(), 2);
}

#[test]
fn evolution_improves_a_simple_objective() {
    // Reward large first outputs on a fixed probe; selection should not
    // lose ground on the running best.
    let config = Config {
        population_size: 30,
        num_inputs: 2,
        num_outputs: 1,
        ..Config::default()
    };
    let mut population = Population::new(config, ChaCha8Rng::seed_from_u64(74));

    let evaluate = |genomes: &mut [neat_engine::Genome]| {
        for genome in genomes.iter_mut() {
            let network = FeedForwardNetwork::from_genome(genome).unwrap();
            genome.fitness = network.activate(&[1.0, -1.0]).unwrap()[0];
        }
    };

    population.run(evaluate, 1);
    let early = population.best_genome().unwrap().fitness;

    population.run(evaluate, 10);
    let late = population.best_genome().unwrap().fitness;

    assert!(late >= early, "best regressed from {early} to {late}");
}
