//! Feed-forward materialization and evaluation of a genome.
//!
//! A [`FeedForwardNetwork`] is derived from a genome on demand, is immutable,
//! and owns no reference back to the genome. Layering considers enabled
//! links only; disabled links contribute nothing to inference.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::activation::Activation;
use crate::error::{Error, Result};
use crate::genome::Genome;
use crate::link::LinkGene;

/// One materialized neuron: metadata plus its enabled incoming links as
/// `(source_id, weight)` pairs.
#[derive(Debug, Clone)]
struct NetworkNeuron {
    neuron_id: i32,
    bias: f64,
    activation: Activation,
    inputs: Vec<(i32, f64)>,
}

/// Inference artifact of a genome: neurons in evaluation order.
#[derive(Debug, Clone)]
pub struct FeedForwardNetwork {
    input_ids: Vec<i32>,
    output_ids: Vec<i32>,
    neurons: Vec<NetworkNeuron>,
}

impl FeedForwardNetwork {
    /// Materializes a genome into an evaluable network.
    ///
    /// Input neurons only seed values, so they are not materialized; every
    /// other placed neuron carries its enabled incoming links. An output
    /// fed exclusively through unreachable neurons is left out of the
    /// evaluation order and keeps emitting `0.0`.
    ///
    /// # Errors
    /// [`Error::InvalidState`] when a layered id has no neuron gene, which
    /// means the genome's link endpoints do not resolve.
    pub fn from_genome(genome: &Genome) -> Result<Self> {
        let input_ids = genome.input_ids();
        let output_ids = genome.output_ids();
        let layers = create_layers(&input_ids, &output_ids, genome.links());
        let placed: HashSet<i32> = layers.iter().flatten().copied().collect();

        let mut neurons = Vec::new();
        for layer in &layers {
            for &neuron_id in layer {
                if neuron_id < 0 {
                    continue;
                }
                let inputs: Vec<(i32, f64)> = genome
                    .links()
                    .iter()
                    .filter(|l| l.is_enabled && l.link_id.output_id == neuron_id)
                    .map(|l| (l.link_id.input_id, l.weight))
                    .collect();
                // An unreached output may cite sources the traversal never
                // placed; it stays at its 0.0 default instead.
                if inputs.iter().any(|(source, _)| !placed.contains(source)) {
                    continue;
                }
                let gene = genome.find_neuron(neuron_id).ok_or_else(|| {
                    Error::InvalidState(format!("layered neuron {neuron_id} has no gene"))
                })?;
                neurons.push(NetworkNeuron {
                    neuron_id,
                    bias: gene.bias,
                    activation: gene.activation,
                    inputs,
                });
            }
        }

        Ok(Self {
            input_ids,
            output_ids,
            neurons,
        })
    }

    /// Ids the next [`activate`](Self::activate) call expects values for, in
    /// order.
    pub fn input_ids(&self) -> &[i32] {
        &self.input_ids
    }

    /// Ids whose values [`activate`](Self::activate) returns, in order.
    pub fn output_ids(&self) -> &[i32] {
        &self.output_ids
    }

    /// Runs one forward pass and returns the output values in output-id
    /// order.
    ///
    /// Outputs start at `0.0`, so an output the graph never reaches emits
    /// `0.0`.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] when `inputs` does not match the input
    /// arity; [`Error::InvalidState`] when evaluation reads a value that was
    /// never computed (a torn graph, impossible for genome-derived
    /// networks).
    pub fn activate(&self, inputs: &[f64]) -> Result<Vec<f64>> {
        if inputs.len() != self.input_ids.len() {
            return Err(Error::InvalidArgument(format!(
                "expected {} input values, got {}",
                self.input_ids.len(),
                inputs.len()
            )));
        }

        let mut values: HashMap<i32, f64> = HashMap::new();
        for (&id, &value) in self.input_ids.iter().zip(inputs) {
            values.insert(id, value);
        }
        for &id in &self.output_ids {
            values.insert(id, 0.0);
        }

        for neuron in &self.neurons {
            let mut sum = neuron.bias;
            for &(source_id, weight) in &neuron.inputs {
                let value = values.get(&source_id).ok_or_else(|| {
                    Error::InvalidState(format!(
                        "neuron {} reads neuron {source_id} before it was computed",
                        neuron.neuron_id
                    ))
                })?;
                sum += weight * value;
            }
            values.insert(neuron.neuron_id, neuron.activation.apply(sum));
        }

        Ok(self.output_ids.iter().map(|id| values[id]).collect())
    }
}

/// Assigns every reachable neuron to an evaluation layer.
///
/// Kahn-style BFS over enabled links: inputs seed layer 0, a neuron joins
/// layer `n + 1` once all of its predecessors have been placed, and neurons
/// within a layer keep discovery order. Outputs land at their computed
/// layer; an output the BFS never reached is appended to the final layer.
pub fn create_layers(
    input_ids: &[i32],
    output_ids: &[i32],
    links: &[LinkGene],
) -> Vec<Vec<i32>> {
    let mut adjacency: HashMap<i32, Vec<i32>> = HashMap::new();
    let mut in_degree: HashMap<i32, usize> = HashMap::new();
    for link in links {
        if link.is_enabled {
            adjacency
                .entry(link.link_id.input_id)
                .or_default()
                .push(link.link_id.output_id);
            *in_degree.entry(link.link_id.output_id).or_insert(0) += 1;
        }
    }

    let mut queue: VecDeque<i32> = VecDeque::new();
    let mut node_layer: HashMap<i32, usize> = HashMap::new();
    let mut layers: Vec<Vec<i32>> = Vec::new();

    for &input in input_ids {
        queue.push_back(input);
        node_layer.insert(input, 0);
    }

    while let Some(current) = queue.pop_front() {
        let layer = node_layer[&current];
        if layers.len() <= layer {
            layers.push(Vec::new());
        }
        if !layers[layer].contains(&current) {
            layers[layer].push(current);
        }

        if let Some(neighbors) = adjacency.get(&current) {
            for &neighbor in neighbors {
                let degree = in_degree
                    .get_mut(&neighbor)
                    .expect("every adjacency target has an in-degree entry");
                *degree -= 1;
                if *degree == 0 {
                    node_layer.insert(neighbor, layer + 1);
                    queue.push_back(neighbor);
                }
            }
        }
    }

    for &output in output_ids {
        match node_layer.get(&output) {
            Some(&layer) => {
                if layers.len() <= layer {
                    layers.push(Vec::new());
                }
                if !layers[layer].contains(&output) {
                    layers[layer].push(output);
                }
            }
            None => {
                if layers.is_empty() {
                    layers.push(Vec::new());
                }
                let last = layers.len() - 1;
                if !layers[last].contains(&output) {
                    layers[last].push(output);
                }
            }
        }
    }

    layers
}
