//! # Native Tree Proofs
//!
//! A `Proof` is what the sparse Merkle tree hands out: an existence flag,
//! the sibling hashes along the key's path (root first, one per level
//! actually traversed), and for non-inclusion the leaf found at the key's
//! position, if any.
//!
//! Verification walks the path bottom-up. The starting node is the queried
//! leaf (inclusion), the auxiliary leaf (non-inclusion at an occupied
//! position) or the empty hash (non-inclusion at an empty position).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use zkid_core::{FieldElement, FieldHasher, Hash, HashError};

/// Error recomputing a root from a proof.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofError {
    /// A non-inclusion proof whose auxiliary leaf has the queried key.
    #[error("non-inclusion proof carries an auxiliary leaf with the queried key {0}")]
    AuxKeyMatchesQuery(FieldElement),

    /// Hash backend failure.
    #[error("hash error: {0}")]
    Hash(#[from] HashError),
}

/// The leaf occupying a non-included key's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAux {
    /// Key of the occupying leaf.
    pub key: Hash,
    /// Value of the occupying leaf.
    pub value: Hash,
}

/// A variable-length inclusion or non-inclusion proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    /// Whether the queried key is in the tree.
    pub existence: bool,
    /// Sibling hashes, root level first. The length is the path depth.
    pub siblings: Vec<Hash>,
    /// The leaf found instead of the queried key, for non-inclusion.
    pub node_aux: Option<NodeAux>,
}

impl Proof {
    /// Number of levels the proof path descends.
    pub fn depth(&self) -> usize {
        self.siblings.len()
    }

    /// Recompute the root this proof commits to for `key` and `value`.
    ///
    /// `value` is only consulted for inclusion proofs.
    pub fn root_from_proof<H: FieldHasher>(
        &self,
        key: &FieldElement,
        value: &FieldElement,
    ) -> Result<Hash, ProofError> {
        let mut node = if self.existence {
            H::hash_leaf(key, value)?
        } else if let Some(aux) = &self.node_aux {
            if aux.key.as_field() == *key {
                return Err(ProofError::AuxKeyMatchesQuery(*key));
            }
            H::hash_leaf(&aux.key.as_field(), &aux.value.as_field())?
        } else {
            Hash::ZERO
        };

        for (level, sibling) in self.siblings.iter().enumerate().rev() {
            node = if key.bit(level) {
                H::hash_middle(sibling, &node)?
            } else {
                H::hash_middle(&node, sibling)?
            };
        }
        Ok(node)
    }
}

/// Check `proof` against `root` for `key` and `value`.
///
/// Malformed proofs and hash failures verify as `false`.
pub fn verify_proof<H: FieldHasher>(
    root: &Hash,
    proof: &Proof,
    key: &FieldElement,
    value: &FieldElement,
) -> bool {
    proof
        .root_from_proof::<H>(key, value)
        .map(|computed| computed == *root)
        .unwrap_or(false)
}
