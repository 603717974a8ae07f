//! Proof serialization errors.

use thiserror::Error;

use zkid_crypto::TreeError;

/// Error producing a circuit proof.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SerializeError {
    /// The proof path is longer than the fixed output depth.
    #[error("proof has {actual} siblings but the circuit depth is {max}")]
    DepthExceeded {
        /// Siblings in the native proof.
        actual: usize,
        /// Target depth.
        max: usize,
    },

    /// The tree failed to produce a proof.
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),
}
