//! Neuron genes and the mutator that creates and perturbs them.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::activation::Activation;
use crate::config::Config;
use crate::rng::RngExt;

/// One node of the genome graph.
///
/// Input neurons carry ids in `[-num_inputs, -1]`, output neurons ids in
/// `[0, num_outputs - 1]`, hidden neurons ids `>= num_outputs`. The id is the
/// alignment key used by crossover.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeuronGene {
    /// Identifier within the id space described above.
    pub neuron_id: i32,
    /// Bias added to the weighted input sum during inference.
    pub bias: f64,
    /// Activation applied to the sum.
    pub activation: Activation,
}

impl NeuronGene {
    /// Combines two matching genes: bias and activation each come from one
    /// parent or the other with equal probability.
    ///
    /// Both genes must carry the same id.
    pub fn crossover<R: Rng>(&self, other: &NeuronGene, rng: &mut R) -> NeuronGene {
        debug_assert_eq!(self.neuron_id, other.neuron_id);
        NeuronGene {
            neuron_id: self.neuron_id,
            bias: rng.pick(0.5, self.bias, other.bias),
            activation: rng.pick(0.5, self.activation, other.activation),
        }
    }
}

/// Creates fresh neuron genes and applies parametric mutation to existing
/// ones. Owns the monotonic id counter of its genome: ids are handed out
/// once and never reused, even after a neuron is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeuronMutator {
    index: i32,
    activation: Activation,
    mean: f64,
    std_dev: f64,
    min: f64,
    max: f64,
    mutation_rate: f64,
    mutation_power: f64,
    replace_rate: f64,
}

impl NeuronMutator {
    /// Builds a mutator from the `[DefaultGenome]` bias parameters. The id
    /// counter starts at 0, so output neurons consume `0..num_outputs` and
    /// hidden ids continue from there.
    pub fn new(config: &Config) -> Self {
        Self {
            index: 0,
            activation: config.activation,
            mean: config.bias_init_mean,
            std_dev: config.bias_init_stddev,
            min: config.bias_min,
            max: config.bias_max,
            mutation_rate: config.mutation_rate,
            mutation_power: config.mutation_power,
            replace_rate: config.replace_rate,
        }
    }

    /// Creates a gene with a fresh id, a Gaussian-clamped bias, and the
    /// configured default activation.
    pub fn new_neuron<R: Rng>(&mut self, rng: &mut R) -> NeuronGene {
        let bias = rng.gaussian_clamped(self.mean, self.std_dev, self.min, self.max);
        NeuronGene {
            neuron_id: self.next(),
            bias,
            activation: self.activation,
        }
    }

    /// Advances and returns the id counter.
    pub fn next(&mut self) -> i32 {
        let id = self.index;
        self.index += 1;
        id
    }

    /// Moves the counter past an inherited id so future ids stay unique
    /// within this genome.
    pub fn align_after(&mut self, neuron_id: i32) {
        if neuron_id >= self.index {
            self.index = neuron_id + 1;
        }
    }

    /// Applies the replace/drift schedule to the bias, and with independent
    /// probability redraws the activation of a hidden neuron. Input and
    /// output activations are never mutated.
    pub fn mutate<R: Rng>(&self, neuron: &mut NeuronGene, num_outputs: usize, rng: &mut R) {
        let p = rng.uniform();
        if p < self.replace_rate {
            neuron.bias = rng.gaussian_clamped(self.mean, self.std_dev, self.min, self.max);
        } else if p < self.replace_rate + self.mutation_rate {
            let delta = rng.gaussian_clamped(0.0, self.mutation_power, self.min, self.max);
            neuron.bias = (neuron.bias + delta).clamp(self.min, self.max);
        }

        if rng.chance(self.mutation_rate) && neuron.neuron_id >= num_outputs as i32 {
            neuron.activation = *rng.choose_from(&Activation::MUTABLE);
        }
    }
}
