//! Core NEAT engine: evolves feed-forward neural networks by mutating and
//! recombining graph genomes.
//!
//! A [`Population`] owns [`Genome`]s; each genome owns its gene sequences
//! and mutators; a [`FeedForwardNetwork`] is derived from a genome on demand
//! for fitness evaluation. Fitness itself comes from an external oracle
//! passed to [`Population::run`].
//!
//! ```no_run
//! use neat_engine::{Config, FeedForwardNetwork, Population};
//!
//! let config = Config {
//!     num_inputs: 2,
//!     num_outputs: 1,
//!     population_size: 50,
//!     ..Config::default()
//! };
//! let mut population = Population::new(config, rand::thread_rng());
//! population.run(
//!     |genomes| {
//!         for genome in genomes.iter_mut() {
//!             let network = FeedForwardNetwork::from_genome(genome).unwrap();
//!             let outputs = network.activate(&[1.0, 0.0]).unwrap();
//!             genome.fitness = -outputs[0].abs();
//!         }
//!     },
//!     20,
//! );
//! ```

pub mod activation;
pub mod config;
pub mod error;
pub mod genome;
pub mod link;
pub mod network;
pub mod neuron;
pub mod population;
pub mod rng;
pub mod snapshot;

pub use activation::Activation;
pub use config::Config;
pub use error::{Error, Result};
pub use genome::{crossover, Genome, GenomeIndexer, FITNESS_NOT_COMPUTED};
pub use link::{LinkGene, LinkId, LinkMutator};
pub use network::{create_layers, FeedForwardNetwork};
pub use neuron::{NeuronGene, NeuronMutator};
pub use population::Population;
pub use rng::RngExt;
pub use snapshot::PopulationSnapshot;
