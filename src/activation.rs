//! Activation functions available for neurons.

use serde::{Deserialize, Serialize};

/// Activation function tag carried by every neuron gene.
///
/// `Softmax` exists as a tag because output neurons are labelled with it at
/// genome construction, but no cross-output normalization is performed: at
/// the per-neuron application site it behaves exactly like
/// [`Linear`](Activation::Linear).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    /// Returns the input unchanged.
    Linear,
    /// Logistic sigmoid: `1 / (1 + e^{-x})`.
    #[default]
    Sigmoid,
    /// Hyperbolic tangent function.
    Tanh,
    /// Rectified Linear Unit: `max(0, x)`.
    Relu,
    /// Tagged on output neurons; applied as [`Linear`](Activation::Linear).
    Softmax,
}

impl Activation {
    /// Variants a mutation may assign to a hidden neuron.
    ///
    /// `Softmax` is deliberately excluded from the draw.
    pub const MUTABLE: [Activation; 4] = [
        Activation::Linear,
        Activation::Sigmoid,
        Activation::Tanh,
        Activation::Relu,
    ];

    /// Applies the activation function to the provided value.
    #[must_use]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Activation::Linear | Activation::Softmax => x,
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::Tanh => x.tanh(),
            Activation::Relu => x.max(0.0),
        }
    }

    /// Name used in configuration files.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Activation::Linear => "LINEAR",
            Activation::Sigmoid => "SIGMOID",
            Activation::Tanh => "TANH",
            Activation::Relu => "RELU",
            Activation::Softmax => "SOFTMAX",
        }
    }
}

impl std::fmt::Display for Activation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Activation {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LINEAR" => Ok(Activation::Linear),
            "SIGMOID" => Ok(Activation::Sigmoid),
            "TANH" => Ok(Activation::Tanh),
            "RELU" => Ok(Activation::Relu),
            "SOFTMAX" => Ok(Activation::Softmax),
            other => Err(crate::error::Error::InvalidArgument(format!(
                "unknown activation `{other}`"
            ))),
        }
    }
}
