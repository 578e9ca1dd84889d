//! The genome: a graph of neuron and link genes plus the mutators that
//! rewrite it.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::activation::Activation;
use crate::config::Config;
use crate::link::{LinkGene, LinkId, LinkMutator};
use crate::neuron::{NeuronGene, NeuronMutator};
use crate::rng::RngExt;

/// Fitness sentinel of a genome that has not been evaluated yet.
pub const FITNESS_NOT_COMPUTED: f64 = f64::MIN;

/// Genetic representation of one candidate network.
///
/// Holds ordered neuron and link gene sequences; iteration order is
/// insertion order, which crossover and mutation rely on. Structural
/// invariants maintained by every public operation:
///
/// - link endpoints always resolve to neurons present in the genome,
/// - the full link set (enabled or not) stays acyclic,
/// - no two links share a [`LinkId`],
/// - `num_hidden` equals the count of neurons with `id >= num_outputs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genome {
    /// Identifier assigned by the population's [`GenomeIndexer`].
    pub genome_id: u32,
    /// Fitness assigned by the evaluation oracle; starts at
    /// [`FITNESS_NOT_COMPUTED`].
    pub fitness: f64,
    num_inputs: usize,
    num_outputs: usize,
    num_hidden: usize,
    neurons: Vec<NeuronGene>,
    links: Vec<LinkGene>,
    neuron_mutator: NeuronMutator,
    link_mutator: LinkMutator,
}

impl Genome {
    /// Creates a genome with no genes. Crossover offspring start here and
    /// inherit everything from their parents.
    pub fn new(genome_id: u32, config: &Config) -> Self {
        Self {
            genome_id,
            fitness: FITNESS_NOT_COMPUTED,
            num_inputs: config.num_inputs,
            num_outputs: config.num_outputs,
            num_hidden: 0,
            neurons: Vec::new(),
            links: Vec::new(),
            neuron_mutator: NeuronMutator::new(config),
            link_mutator: LinkMutator::new(config),
        }
    }

    /// Creates a densely seeded genome: every input is linked to every
    /// output, and when hidden neurons are configured, every input to every
    /// hidden and every hidden to every output.
    ///
    /// Inputs get ids `-1, -2, …` with zero bias and linear activation.
    /// Outputs take the first counter ids and the softmax tag (applied as
    /// linear during inference). Hidden neurons use the configured default
    /// activation.
    pub fn seeded<R: Rng>(genome_id: u32, config: &Config, rng: &mut R) -> Self {
        let mut genome = Self::new(genome_id, config);

        for i in 0..config.num_inputs {
            genome.add_neuron(NeuronGene {
                neuron_id: -(i as i32) - 1,
                bias: 0.0,
                activation: Activation::Linear,
            });
        }

        for _ in 0..config.num_outputs {
            let mut neuron = genome.neuron_mutator.new_neuron(rng);
            neuron.activation = Activation::Softmax;
            genome.add_neuron(neuron);
        }

        for _ in 0..config.num_hidden {
            let neuron = genome.neuron_mutator.new_neuron(rng);
            genome.add_neuron(neuron);
        }

        for i in 0..config.num_inputs {
            for j in 0..config.num_outputs {
                let link = genome
                    .link_mutator
                    .new_link(-(i as i32) - 1, j as i32, rng);
                genome.add_link(link);
            }
        }

        for h in 0..config.num_hidden {
            let hidden_id = (config.num_outputs + h) as i32;
            for j in 0..config.num_outputs {
                let link = genome.link_mutator.new_link(hidden_id, j as i32, rng);
                genome.add_link(link);
            }
            for i in 0..config.num_inputs {
                let link = genome
                    .link_mutator
                    .new_link(-(i as i32) - 1, hidden_id, rng);
                genome.add_link(link);
            }
        }

        genome
    }

    /// Input neuron count.
    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    /// Output neuron count.
    pub fn num_outputs(&self) -> usize {
        self.num_outputs
    }

    /// Live hidden neuron count.
    pub fn num_hidden(&self) -> usize {
        self.num_hidden
    }

    /// Neuron genes in insertion order.
    pub fn neurons(&self) -> &[NeuronGene] {
        &self.neurons
    }

    /// Link genes in insertion order.
    pub fn links(&self) -> &[LinkGene] {
        &self.links
    }

    /// Ids of the input neurons, `-1` downwards.
    pub fn input_ids(&self) -> Vec<i32> {
        (0..self.num_inputs).map(|i| -(i as i32) - 1).collect()
    }

    /// Ids of the output neurons, `0` upwards.
    pub fn output_ids(&self) -> Vec<i32> {
        (0..self.num_outputs).map(|i| i as i32).collect()
    }

    /// Appends a neuron gene, keeping `num_hidden` and the id counter
    /// consistent with the gene's id.
    pub fn add_neuron(&mut self, neuron: NeuronGene) {
        if neuron.neuron_id >= self.num_outputs as i32 {
            self.num_hidden += 1;
        }
        self.neuron_mutator.align_after(neuron.neuron_id);
        self.neurons.push(neuron);
    }

    /// Appends a link gene. Callers guarantee the id is not already present.
    pub fn add_link(&mut self, link: LinkGene) {
        self.links.push(link);
    }

    /// Looks a neuron up by id.
    pub fn find_neuron(&self, neuron_id: i32) -> Option<&NeuronGene> {
        self.neurons.iter().find(|n| n.neuron_id == neuron_id)
    }

    /// Looks a link up by id.
    pub fn find_link(&self, link_id: LinkId) -> Option<&LinkGene> {
        self.links.iter().find(|l| l.link_id == link_id)
    }

    fn find_link_mut(&mut self, link_id: LinkId) -> Option<&mut LinkGene> {
        self.links.iter_mut().find(|l| l.link_id == link_id)
    }

    /// Applies one round of mutation: the structural edits, then the
    /// parametric pass over every link and neuron.
    ///
    /// A single draw gates all four structural probabilities, so the events
    /// nest rather than fire independently: with the defaults, a draw below
    /// `link_del_prob` triggers every structural mutation at once.
    pub fn mutate<R: Rng>(&mut self, config: &Config, rng: &mut R) {
        let p = rng.uniform();

        if p < config.neuron_add_prob {
            self.mutate_add_neuron(rng);
        }
        if p < config.neuron_del_prob {
            self.mutate_remove_neuron(rng);
        }
        if p < config.link_add_prob {
            self.mutate_add_link(rng);
        }
        if p < config.link_del_prob {
            self.mutate_remove_link(rng);
        }

        let link_mutator = &self.link_mutator;
        for link in self.links.iter_mut() {
            link_mutator.mutate(link, rng);
        }

        let neuron_mutator = &self.neuron_mutator;
        let num_outputs = self.num_outputs;
        for neuron in self.neurons.iter_mut() {
            neuron_mutator.mutate(neuron, num_outputs, rng);
        }
    }

    /// Splits a uniformly chosen link (enabled or not) with a fresh hidden
    /// neuron. The old link is disabled but retained for inheritance; the
    /// two replacement links carry weight `1.0` into the new neuron and the
    /// old weight out of it.
    pub fn mutate_add_neuron<R: Rng>(&mut self, rng: &mut R) {
        if self.links.is_empty() {
            return;
        }

        let index = rng.choose_index(self.links.len());
        self.links[index].is_enabled = false;
        let LinkId {
            input_id,
            output_id,
        } = self.links[index].link_id;
        let weight = self.links[index].weight;

        let neuron = self.neuron_mutator.new_neuron(rng);
        let neuron_id = neuron.neuron_id;
        self.add_neuron(neuron);

        self.add_link(LinkGene {
            link_id: LinkId::new(input_id, neuron_id),
            weight: 1.0,
            is_enabled: true,
        });
        self.add_link(LinkGene {
            link_id: LinkId::new(neuron_id, output_id),
            weight,
            is_enabled: true,
        });
    }

    /// Removes a uniformly chosen hidden neuron and every link incident to
    /// it. No-op when the genome has no hidden neurons.
    pub fn mutate_remove_neuron<R: Rng>(&mut self, rng: &mut R) {
        if self.num_hidden == 0 {
            return;
        }

        let num_outputs = self.num_outputs as i32;
        let index = loop {
            let candidate = rng.choose_index(self.neurons.len());
            if self.neurons[candidate].neuron_id >= num_outputs {
                break candidate;
            }
        };
        let neuron_id = self.neurons[index].neuron_id;

        self.links
            .retain(|l| l.link_id.input_id != neuron_id && l.link_id.output_id != neuron_id);
        self.neurons.remove(index);
        self.num_hidden -= 1;
    }

    /// Proposes a link from a uniformly chosen input-or-hidden neuron to a
    /// uniformly chosen output-or-hidden neuron. A colliding id re-enables
    /// the existing link; a self-loop or a cycle rejects the proposal.
    pub fn mutate_add_link<R: Rng>(&mut self, rng: &mut R) {
        let num_outputs = self.num_outputs as i32;
        let sources: Vec<i32> = self
            .neurons
            .iter()
            .filter(|n| n.neuron_id < 0 || n.neuron_id >= num_outputs)
            .map(|n| n.neuron_id)
            .collect();
        let targets: Vec<i32> = self
            .neurons
            .iter()
            .filter(|n| n.neuron_id >= 0)
            .map(|n| n.neuron_id)
            .collect();
        if sources.is_empty() || targets.is_empty() {
            return;
        }

        let input_id = *rng.choose_from(&sources);
        let output_id = *rng.choose_from(&targets);
        let link_id = LinkId::new(input_id, output_id);

        if let Some(existing) = self.find_link_mut(link_id) {
            existing.is_enabled = true;
            return;
        }

        if is_cyclic(&self.links, input_id, output_id) {
            return;
        }

        let link = self.link_mutator.new_link(input_id, output_id, rng);
        self.add_link(link);
    }

    /// Removes a uniformly chosen link. No-op when the genome has none.
    pub fn mutate_remove_link<R: Rng>(&mut self, rng: &mut R) {
        if self.links.is_empty() {
            return;
        }
        let index = rng.choose_index(self.links.len());
        self.links.remove(index);
    }
}

/// Hands out genome ids; owned by the population and shared between initial
/// seeding and crossover.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct GenomeIndexer {
    index: u32,
}

impl GenomeIndexer {
    /// Creates an indexer starting at id 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances and returns the counter.
    pub fn next(&mut self) -> u32 {
        let id = self.index;
        self.index += 1;
        id
    }
}

/// Combines two parents into one offspring.
///
/// The fitter parent dominates: disjoint and excess genes come from it
/// unchanged, while genes whose ids appear in both parents are crossed
/// field-wise at 50/50. The offspring starts empty and inherits genes only
/// from its parents, so the genome invariants carry over directly.
pub fn crossover<R: Rng>(
    g1: &Genome,
    g2: &Genome,
    config: &Config,
    indexer: &mut GenomeIndexer,
    rng: &mut R,
) -> Genome {
    if g2.fitness > g1.fitness {
        return crossover(g2, g1, config, indexer, rng);
    }

    let mut offspring = Genome::new(indexer.next(), config);

    for n1 in &g1.neurons {
        let gene = match g2.find_neuron(n1.neuron_id) {
            Some(n2) => n1.crossover(n2, rng),
            None => *n1,
        };
        offspring.add_neuron(gene);
    }

    for l1 in &g1.links {
        let gene = match g2.find_link(l1.link_id) {
            Some(l2) => l1.crossover(l2, rng),
            None => *l1,
        };
        offspring.add_link(gene);
    }

    offspring
}

/// Reports whether adding the edge `input_id -> output_id` would close a
/// cycle: true when the endpoints coincide or when any directed path leads
/// from `output_id` back to `input_id`. The walk covers the full link set,
/// disabled links included.
pub fn is_cyclic(links: &[LinkGene], input_id: i32, output_id: i32) -> bool {
    if input_id == output_id {
        return true;
    }

    let mut visited = HashSet::new();
    let mut stack = vec![output_id];
    while let Some(node) = stack.pop() {
        if node == input_id {
            return true;
        }
        if !visited.insert(node) {
            continue;
        }
        for link in links {
            if link.link_id.input_id == node {
                stack.push(link.link_id.output_id);
            }
        }
    }
    false
}
