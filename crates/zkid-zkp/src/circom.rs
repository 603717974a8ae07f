//! # Circom Verifier Inputs
//!
//! circomlib's `SMTVerifier` takes the aux leaf as `oldKey`/`oldValue`, a
//! flag `isOld0` for an empty position, and `fnc` selecting inclusion (0)
//! or non-inclusion (1).

use serde::{Deserialize, Serialize};

use zkid_core::{serde_array, FieldElement, Hash};
use zkid_crypto::{AuthenticatedTree, Proof};

use crate::error::SerializeError;
use crate::serializer::{serialize_proof, AuxNode, CircuitProof, SerializedProof};

/// `fnc` for an inclusion proof.
pub const FNC_INCLUSION: u8 = 0;
/// `fnc` for a non-inclusion proof.
pub const FNC_NON_INCLUSION: u8 = 1;

/// Input signals for a depth-`DEPTH` circom SMT verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircomVerifierProof<const DEPTH: usize> {
    /// Tree root the proof is checked against.
    pub root: Hash,
    /// Sibling hashes from the root down, zero-padded to `DEPTH`.
    #[serde(with = "serde_array")]
    pub siblings: [Hash; DEPTH],
    /// Key of the leaf met on the path of a non-inclusion proof; zero
    /// otherwise.
    pub old_key: Hash,
    /// Value of that leaf; zero otherwise.
    pub old_value: Hash,
    /// Non-inclusion ending at an empty subtree.
    pub is_old0: bool,
    /// The queried key.
    pub key: FieldElement,
    /// The value stored under `key`, or the colliding leaf's value.
    pub value: FieldElement,
    /// [`FNC_INCLUSION`] or [`FNC_NON_INCLUSION`].
    pub fnc: u8,
}

impl<const DEPTH: usize> CircomVerifierProof<DEPTH> {
    /// Pad `proof` and map it to verifier inputs.
    pub fn from_proof(
        proof: &Proof,
        root: Hash,
        key: FieldElement,
        value: FieldElement,
    ) -> Result<Self, SerializeError> {
        serialize_proof::<DEPTH>(proof, root, key, value).map(|p| Self::from(&p))
    }

    /// Prove `key` against the tree's current root.
    pub fn from_tree<T: AuthenticatedTree + ?Sized>(
        tree: &T,
        key: FieldElement,
    ) -> Result<Self, SerializeError> {
        CircuitProof::<DEPTH>::from_tree(tree, key).map(|p| Self::from(&p))
    }
}

impl<const DEPTH: usize> From<&CircuitProof<DEPTH>> for CircomVerifierProof<DEPTH> {
    fn from(p: &CircuitProof<DEPTH>) -> Self {
        let aux = p.aux();
        Self {
            root: p.root,
            siblings: p.siblings,
            old_key: p.aux_index,
            old_value: p.aux_value,
            is_old0: aux == AuxNode::Empty,
            key: p.index,
            value: p.value,
            fnc: fnc_for(aux),
        }
    }
}

/// Runtime-depth form of `CircomVerifierProof`, with the same JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedCircomProof {
    /// Tree root.
    pub root: Hash,
    /// Sibling hashes, zero-padded to the requested depth.
    pub siblings: Vec<Hash>,
    /// Colliding leaf key, or zero.
    pub old_key: Hash,
    /// Colliding leaf value, or zero.
    pub old_value: Hash,
    /// Non-inclusion ending at an empty subtree.
    pub is_old0: bool,
    /// The queried key.
    pub key: FieldElement,
    /// Value reported with the proof.
    pub value: FieldElement,
    /// 0 for inclusion, 1 for non-inclusion.
    pub fnc: u8,
}

impl From<&SerializedProof> for SerializedCircomProof {
    fn from(p: &SerializedProof) -> Self {
        let aux = p.aux();
        Self {
            root: p.root,
            siblings: p.siblings.clone(),
            old_key: p.aux_index,
            old_value: p.aux_value,
            is_old0: aux == AuxNode::Empty,
            key: p.index,
            value: p.value,
            fnc: fnc_for(aux),
        }
    }
}

fn fnc_for(aux: AuxNode) -> u8 {
    if aux == AuxNode::Inclusion {
        FNC_INCLUSION
    } else {
        FNC_NON_INCLUSION
    }
}
