//! Engine configuration.
//!
//! The on-disk format is a flat sectioned file: `[Section]` headers followed
//! by `key = value` lines. `#` starts a comment. Unrecognized sections and
//! keys are ignored; keys that never appear keep their defaults, so an empty
//! file is a valid configuration.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::activation::Activation;
use crate::error::{Error, Result};

/// All tunables of the engine, preloaded with the documented defaults.
///
/// `[NEAT]` keys drive the generational loop; `[DefaultGenome]` keys drive
/// genome construction and mutation. The config is embedded into snapshots
/// so a resumed run breeds under the same parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Genomes per generation.
    pub population_size: usize,
    /// Upper bound on generations for [`run`](crate::population::Population::run).
    pub max_generations: usize,
    /// Top fraction of the ranked population kept as breeders.
    pub survival_threshold: f64,

    /// Input neuron count.
    pub num_inputs: usize,
    /// Output neuron count.
    pub num_outputs: usize,
    /// Hidden neuron count of a freshly seeded genome.
    pub num_hidden: usize,
    /// Activation assigned to new hidden neurons.
    pub activation: Activation,

    /// Mean of the Gaussian used for initial and resampled biases.
    pub bias_init_mean: f64,
    /// Standard deviation of the bias Gaussian.
    pub bias_init_stddev: f64,
    /// Lower bias clamp.
    pub bias_min: f64,
    /// Upper bias clamp.
    pub bias_max: f64,

    /// Mean of the Gaussian used for initial and resampled weights.
    pub weight_init_mean: f64,
    /// Standard deviation of the weight Gaussian.
    pub weight_init_stddev: f64,
    /// Lower weight clamp.
    pub weight_min: f64,
    /// Upper weight clamp.
    pub weight_max: f64,

    /// Probability of a parametric drift per gene and per activation redraw.
    pub mutation_rate: f64,
    /// Standard deviation of the drift added to a bias or weight.
    pub mutation_power: f64,
    /// Probability of resampling a bias or weight from scratch.
    pub replace_rate: f64,

    /// Probability of splitting a link with a new neuron.
    pub neuron_add_prob: f64,
    /// Probability of deleting a hidden neuron.
    pub neuron_del_prob: f64,
    /// Probability of adding a link.
    pub link_add_prob: f64,
    /// Probability of deleting a link.
    pub link_del_prob: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            population_size: 150,
            max_generations: 100,
            survival_threshold: 0.2,
            num_inputs: 1,
            num_outputs: 3,
            num_hidden: 0,
            activation: Activation::Sigmoid,
            bias_init_mean: 0.0,
            bias_init_stddev: 1.0,
            bias_min: -30.0,
            bias_max: 30.0,
            weight_init_mean: 0.0,
            weight_init_stddev: 1.0,
            weight_min: -30.0,
            weight_max: 30.0,
            mutation_rate: 0.3,
            mutation_power: 0.8,
            replace_rate: 0.05,
            neuron_add_prob: 0.03,
            neuron_del_prob: 0.01,
            link_add_prob: 0.05,
            link_del_prob: 0.01,
        }
    }
}

impl Config {
    /// Reads a configuration file, overlaying the defaults.
    ///
    /// # Errors
    /// [`Error::Io`] when the file cannot be read, [`Error::InvalidArgument`]
    /// when a recognized key carries an unparseable value.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        fs::read_to_string(path)?.parse()
    }

    /// Writes every key back out in the sectioned `key = value` format.
    ///
    /// # Errors
    /// [`Error::Io`] when the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.render()).map_err(Error::from)
    }

    fn render(&self) -> String {
        format!(
            "[NEAT]\n\
             population_size = {}\n\
             max_generations = {}\n\
             survival_threshold = {}\n\
             \n\
             [DefaultGenome]\n\
             num_inputs = {}\n\
             num_outputs = {}\n\
             num_hidden = {}\n\
             activation = {}\n\
             bias_init_mean = {}\n\
             bias_init_stddev = {}\n\
             bias_min = {}\n\
             bias_max = {}\n\
             weight_init_mean = {}\n\
             weight_init_stddev = {}\n\
             weight_min = {}\n\
             weight_max = {}\n\
             mutation_rate = {}\n\
             mutation_power = {}\n\
             replace_rate = {}\n\
             neuron_add_prob = {}\n\
             neuron_del_prob = {}\n\
             link_add_prob = {}\n\
             link_del_prob = {}\n",
            self.population_size,
            self.max_generations,
            self.survival_threshold,
            self.num_inputs,
            self.num_outputs,
            self.num_hidden,
            self.activation,
            self.bias_init_mean,
            self.bias_init_stddev,
            self.bias_min,
            self.bias_max,
            self.weight_init_mean,
            self.weight_init_stddev,
            self.weight_min,
            self.weight_max,
            self.mutation_rate,
            self.mutation_power,
            self.replace_rate,
            self.neuron_add_prob,
            self.neuron_del_prob,
            self.link_add_prob,
            self.link_del_prob,
        )
    }

    fn apply(&mut self, section: &str, key: &str, value: &str) -> Result<()> {
        match (section, key) {
            ("NEAT", "population_size") => self.population_size = parse(key, value)?,
            ("NEAT", "max_generations") => self.max_generations = parse(key, value)?,
            ("NEAT", "survival_threshold") => self.survival_threshold = parse(key, value)?,
            ("DefaultGenome", "num_inputs") => self.num_inputs = parse(key, value)?,
            ("DefaultGenome", "num_outputs") => self.num_outputs = parse(key, value)?,
            ("DefaultGenome", "num_hidden") => self.num_hidden = parse(key, value)?,
            ("DefaultGenome", "activation") => self.activation = value.parse()?,
            ("DefaultGenome", "bias_init_mean") => self.bias_init_mean = parse(key, value)?,
            ("DefaultGenome", "bias_init_stddev") => self.bias_init_stddev = parse(key, value)?,
            ("DefaultGenome", "bias_min") => self.bias_min = parse(key, value)?,
            ("DefaultGenome", "bias_max") => self.bias_max = parse(key, value)?,
            ("DefaultGenome", "weight_init_mean") => self.weight_init_mean = parse(key, value)?,
            ("DefaultGenome", "weight_init_stddev") => {
                self.weight_init_stddev = parse(key, value)?
            }
            ("DefaultGenome", "weight_min") => self.weight_min = parse(key, value)?,
            ("DefaultGenome", "weight_max") => self.weight_max = parse(key, value)?,
            ("DefaultGenome", "mutation_rate") => self.mutation_rate = parse(key, value)?,
            ("DefaultGenome", "mutation_power") => self.mutation_power = parse(key, value)?,
            ("DefaultGenome", "replace_rate") => self.replace_rate = parse(key, value)?,
            ("DefaultGenome", "neuron_add_prob") => self.neuron_add_prob = parse(key, value)?,
            ("DefaultGenome", "neuron_del_prob") => self.neuron_del_prob = parse(key, value)?,
            ("DefaultGenome", "link_add_prob") => self.link_add_prob = parse(key, value)?,
            ("DefaultGenome", "link_del_prob") => self.link_del_prob = parse(key, value)?,
            // Unknown sections and keys are ignored on purpose.
            _ => {}
        }
        Ok(())
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let mut config = Config::default();
        let mut section = String::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                section = name.trim().to_string();
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                config.apply(&section, key.trim(), value.trim())?;
            }
        }
        Ok(config)
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::InvalidArgument(format!("bad value `{value}` for key `{key}`")))
}
