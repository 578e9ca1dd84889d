//! Link genes and the mutator that creates and perturbs them.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::rng::RngExt;

/// Identity of a directed edge: the ids of its endpoints.
///
/// A genome never holds two links with the same `LinkId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkId {
    /// Id of the neuron feeding the link.
    pub input_id: i32,
    /// Id of the neuron the link feeds into.
    pub output_id: i32,
}

impl LinkId {
    /// Creates the id of an edge `input_id -> output_id`.
    pub fn new(input_id: i32, output_id: i32) -> Self {
        Self {
            input_id,
            output_id,
        }
    }
}

/// One weighted edge of the genome graph.
///
/// A disabled link is retained for inheritance but contributes nothing to
/// inference or to topological layering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkGene {
    /// Endpoint pair identifying this link.
    pub link_id: LinkId,
    /// Multiplier applied to the source value during inference.
    pub weight: f64,
    /// Whether the link participates in inference.
    pub is_enabled: bool,
}

impl LinkGene {
    /// Combines two matching genes: weight and enabled flag each come from
    /// one parent or the other with equal probability.
    ///
    /// Both genes must carry the same `LinkId`.
    pub fn crossover<R: Rng>(&self, other: &LinkGene, rng: &mut R) -> LinkGene {
        debug_assert_eq!(self.link_id, other.link_id);
        LinkGene {
            link_id: self.link_id,
            weight: rng.pick(0.5, self.weight, other.weight),
            is_enabled: rng.pick(0.5, self.is_enabled, other.is_enabled),
        }
    }
}

/// Creates fresh link genes and applies parametric mutation to existing
/// ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkMutator {
    mean: f64,
    std_dev: f64,
    min: f64,
    max: f64,
    mutation_rate: f64,
    mutation_power: f64,
    replace_rate: f64,
}

impl LinkMutator {
    /// Builds a mutator from the `[DefaultGenome]` weight parameters.
    pub fn new(config: &Config) -> Self {
        Self {
            mean: config.weight_init_mean,
            std_dev: config.weight_init_stddev,
            min: config.weight_min,
            max: config.weight_max,
            mutation_rate: config.mutation_rate,
            mutation_power: config.mutation_power,
            replace_rate: config.replace_rate,
        }
    }

    /// Creates an enabled link with a Gaussian-clamped weight.
    pub fn new_link<R: Rng>(&self, input_id: i32, output_id: i32, rng: &mut R) -> LinkGene {
        LinkGene {
            link_id: LinkId::new(input_id, output_id),
            weight: rng.gaussian_clamped(self.mean, self.std_dev, self.min, self.max),
            is_enabled: true,
        }
    }

    /// Applies the replace/drift schedule to the weight. The enabled flag is
    /// left alone; links are only disabled by the add-neuron split and only
    /// re-enabled by a colliding add-link.
    pub fn mutate<R: Rng>(&self, link: &mut LinkGene, rng: &mut R) {
        let p = rng.uniform();
        if p < self.replace_rate {
            link.weight = rng.gaussian_clamped(self.mean, self.std_dev, self.min, self.max);
        } else if p < self.replace_rate + self.mutation_rate {
            let delta = rng.gaussian_clamped(0.0, self.mutation_power, self.min, self.max);
            link.weight = (link.weight + delta).clamp(self.min, self.max);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn link_id_equality_is_on_both_endpoints() {
        assert_eq!(LinkId::new(-1, 0), LinkId::new(-1, 0));
        assert_ne!(LinkId::new(-1, 0), LinkId::new(0, -1));
    }

    #[test]
    fn new_link_is_enabled_and_clamped() {
        let mut rng = ChaCha8Rng::seed_from_u64(20);
        let mut config = Config::default();
        config.weight_min = -2.0;
        config.weight_max = 2.0;
        let m = LinkMutator::new(&config);
        for _ in 0..200 {
            let link = m.new_link(-1, 0, &mut rng);
            assert!(link.is_enabled);
            assert!((-2.0..=2.0).contains(&link.weight));
        }
    }

    #[test]
    fn mutate_never_touches_the_enabled_flag() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut config = Config::default();
        config.mutation_rate = 1.0;
        let m = LinkMutator::new(&config);
        let mut link = LinkGene {
            link_id: LinkId::new(-1, 0),
            weight: 0.0,
            is_enabled: false,
        };
        for _ in 0..100 {
            m.mutate(&mut link, &mut rng);
            assert!(!link.is_enabled);
        }
    }

    #[test]
    fn drift_keeps_weight_within_clamp() {
        let mut rng = ChaCha8Rng::seed_from_u64(22);
        let mut config = Config::default();
        config.mutation_rate = 1.0;
        config.replace_rate = 0.0;
        config.mutation_power = 50.0;
        let m = LinkMutator::new(&config);
        let mut link = m.new_link(-1, 0, &mut rng);
        for _ in 0..100 {
            m.mutate(&mut link, &mut rng);
            assert!((-30.0..=30.0).contains(&link.weight));
        }
    }

    #[test]
    fn crossover_takes_each_field_from_a_parent() {
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        let a = LinkGene {
            link_id: LinkId::new(-1, 0),
            weight: 0.25,
            is_enabled: true,
        };
        let b = LinkGene {
            link_id: LinkId::new(-1, 0),
            weight: -0.75,
            is_enabled: false,
        };
        for _ in 0..50 {
            let child = a.crossover(&b, &mut rng);
            assert_eq!(child.link_id, a.link_id);
            assert!(child.weight == 0.25 || child.weight == -0.75);
        }
    }
}
