//! The generational loop: evaluate, rank, truncate, breed, mutate.

use std::cmp::Ordering;
use std::time::Instant;

use log::{debug, info};
use rand::Rng;

use crate::config::Config;
use crate::genome::{crossover, Genome, GenomeIndexer};
use crate::rng::RngExt;

/// Current generation of genomes plus the machinery to breed the next one.
///
/// Selection is pure rank truncation with uniform mating: the top
/// `survival_threshold` fraction breeds, parents are drawn uniformly with
/// replacement, and there is no speciation and no explicit elitism; the
/// champion survives only by being bred from.
#[derive(Debug)]
pub struct Population<R: Rng> {
    config: Config,
    rng: R,
    indexer: GenomeIndexer,
    genomes: Vec<Genome>,
    best: Option<Genome>,
}

impl<R: Rng> Population<R> {
    /// Seeds `population_size` dense genomes with ids from a shared counter.
    pub fn new(config: Config, mut rng: R) -> Self {
        let mut indexer = GenomeIndexer::new();
        let genomes = (0..config.population_size)
            .map(|_| Genome::seeded(indexer.next(), &config, &mut rng))
            .collect();
        Self {
            config,
            rng,
            indexer,
            genomes,
            best: None,
        }
    }

    /// Rebuilds a population from previously saved state.
    pub(crate) fn from_parts(
        config: Config,
        rng: R,
        indexer: GenomeIndexer,
        genomes: Vec<Genome>,
        best: Option<Genome>,
    ) -> Self {
        Self {
            config,
            rng,
            indexer,
            genomes,
            best,
        }
    }

    /// The configuration this population breeds under.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The current generation, in breeding order.
    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    /// Highest-fitness genome seen across all generations so far.
    pub fn best_genome(&self) -> Option<&Genome> {
        self.best.as_ref()
    }

    pub(crate) fn indexer(&self) -> &GenomeIndexer {
        &self.indexer
    }

    /// Runs the generational loop.
    ///
    /// Each generation, `compute_fitness` receives the current genomes as a
    /// mutable slice and must assign every genome a finite fitness before
    /// returning; it must not add, remove, or reorder genomes. The loop has
    /// no error path and runs to `max_generations`.
    pub fn run<F>(&mut self, mut compute_fitness: F, max_generations: usize)
    where
        F: FnMut(&mut [Genome]),
    {
        for generation in 1..=max_generations {
            let started = Instant::now();
            debug!(
                "generation {generation}: evaluating {} genomes",
                self.genomes.len()
            );

            compute_fitness(&mut self.genomes);
            self.update_best();

            let best_fitness = self.best.as_ref().map(|b| b.fitness);
            self.genomes = self.reproduce();

            info!(
                "generation {generation} finished in {:.2?}, best fitness {:?}",
                started.elapsed(),
                best_fitness
            );
        }
    }

    /// Breeds the next generation: rank by fitness, keep the top
    /// `ceil(survival_threshold * population_size)` as breeders, then fill
    /// `population_size` slots with mutated crossover offspring of uniformly
    /// drawn parent pairs.
    pub fn reproduce(&mut self) -> Vec<Genome> {
        if self.genomes.is_empty() {
            return Vec::new();
        }

        self.genomes.sort_by(|a, b| {
            b.fitness
                .partial_cmp(&a.fitness)
                .unwrap_or(Ordering::Equal)
        });

        let cutoff = (self.config.survival_threshold * self.config.population_size as f64).ceil()
            as usize;
        let cutoff = cutoff.clamp(1, self.genomes.len());
        let breeders = &self.genomes[..cutoff];
        debug!("breeding from the top {cutoff} of {} genomes", self.genomes.len());

        let mut next_generation = Vec::with_capacity(self.config.population_size);
        while next_generation.len() < self.config.population_size {
            let p1 = self.rng.choose_from(breeders);
            let p2 = self.rng.choose_from(breeders);
            let mut offspring = crossover(p1, p2, &self.config, &mut self.indexer, &mut self.rng);
            offspring.mutate(&self.config, &mut self.rng);
            next_generation.push(offspring);
        }
        next_generation
    }

    fn update_best(&mut self) {
        for genome in &self.genomes {
            let improved = self
                .best
                .as_ref()
                .map_or(true, |best| genome.fitness > best.fitness);
            if improved {
                self.best = Some(genome.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn new_population_has_the_configured_size() {
        let population = Population::new(tiny_config(), ChaCha8Rng::seed_from_u64(40));
        assert_eq!(population.genomes().len(), 4);
        let ids: Vec<u32> = population.genomes().iter().map(|g| g.genome_id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn best_tracks_strict_improvements_only() {
        let mut population = Population::new(tiny_config(), ChaCha8Rng::seed_from_u64(41));
        for genome in &mut population.genomes {
            genome.fitness = 1.0;
        }
        population.genomes[2].fitness = 3.0;
        population.update_best();
        let best_id = population.best_genome().unwrap().genome_id;
        assert_eq!(best_id, 2);

        // An equal fitness later does not displace the stored best.
        population.genomes[3].fitness = 3.0;
        population.update_best();
        assert_eq!(population.best_genome().unwrap().genome_id, best_id);
    }

    #[test]
    fn reproduce_emits_exactly_population_size_offspring() {
        let mut population = Population::new(tiny_config(), ChaCha8Rng::seed_from_u64(42));
        for genome in &mut population.genomes {
            genome.fitness = genome.genome_id as f64;
        }
        let next = population.reproduce();
        assert_eq!(next.len(), 4);
    }
}
