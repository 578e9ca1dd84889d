//! Error types shared across the engine.

use thiserror::Error;

/// Errors surfaced by the engine.
///
/// Every error is fatal to the operation that produced it; the engine never
/// attempts local recovery.
#[derive(Debug, Error)]
pub enum Error {
    /// A caller-supplied value was rejected (wrong input arity, malformed
    /// configuration value, misused constructor).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Evaluation referenced a neuron whose value was never computed,
    /// which indicates a torn graph.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Reading or writing a configuration or snapshot file failed.
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type used by engine APIs.
pub type Result<T> = std::result::Result<T, Error>;
