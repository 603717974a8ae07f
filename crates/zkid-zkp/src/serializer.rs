//! # Fixed-Depth Proof Serializer
//!
//! The tree returns siblings only down to the level where its path ends. A
//! circuit walks a fixed number of levels, so the siblings are right-padded
//! with `Hash::ZERO` to exactly the circuit depth.
//!
//! The auxiliary fields follow one of three cases:
//!
//! | Case | `existence` | `auxExistence` | `auxIndex` / `auxValue` |
//! |------|-------------|----------------|-------------------------|
//! | inclusion | true | false | 0 / 0 |
//! | non-inclusion, other leaf at the position | false | true | that leaf |
//! | non-inclusion, empty position | false | false | 0 / 0 |

use serde::{Deserialize, Serialize};

use zkid_core::{serde_array, FieldElement, FieldHasher, Hash};
use zkid_crypto::{verify_proof, AuthenticatedTree, NodeAux, Proof};

use crate::error::SerializeError;

/// What sits at the end of a proof path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuxNode {
    /// The queried key itself.
    Inclusion,
    /// A different leaf occupies the queried key's position.
    Collision {
        /// The occupying leaf's key.
        key: Hash,
        /// The occupying leaf's value.
        value: Hash,
    },
    /// The position is empty.
    Empty,
}

impl AuxNode {
    /// Classify a native proof.
    pub fn from_proof(proof: &Proof) -> Self {
        if proof.existence {
            return AuxNode::Inclusion;
        }
        match proof.node_aux {
            Some(NodeAux { key, value }) => AuxNode::Collision { key, value },
            None => AuxNode::Empty,
        }
    }

    /// `(auxExistence, auxIndex, auxValue)`.
    pub fn to_fields(&self) -> (bool, Hash, Hash) {
        match *self {
            AuxNode::Collision { key, value } => (true, key, value),
            AuxNode::Inclusion | AuxNode::Empty => (false, Hash::ZERO, Hash::ZERO),
        }
    }
}

/// A proof padded to exactly `DEPTH` siblings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitProof<const DEPTH: usize> {
    /// Root the proof is against.
    pub root: Hash,
    /// Whether `index` is in the tree.
    pub existence: bool,
    /// Siblings, root level first, zero-padded.
    #[serde(with = "serde_array")]
    pub siblings: [Hash; DEPTH],
    /// Queried key.
    pub index: FieldElement,
    /// Value found at the key, the colliding leaf's value, or zero.
    pub value: FieldElement,
    /// Whether a different leaf occupies the key's position.
    pub aux_existence: bool,
    /// The colliding leaf's key, or zero.
    pub aux_index: Hash,
    /// The colliding leaf's value, or zero.
    pub aux_value: Hash,
}

/// Pad a native proof to `DEPTH` siblings.
///
/// Fails with `DepthExceeded` if the proof has more than `DEPTH` siblings.
pub fn serialize_proof<const DEPTH: usize>(
    proof: &Proof,
    root: Hash,
    index: FieldElement,
    value: FieldElement,
) -> Result<CircuitProof<DEPTH>, SerializeError> {
    check_depth(proof, DEPTH)?;
    let mut siblings = [Hash::ZERO; DEPTH];
    siblings[..proof.siblings.len()].copy_from_slice(&proof.siblings);

    let (aux_existence, aux_index, aux_value) = AuxNode::from_proof(proof).to_fields();
    Ok(CircuitProof {
        root,
        existence: proof.existence,
        siblings,
        index,
        value,
        aux_existence,
        aux_index,
        aux_value,
    })
}

impl<const DEPTH: usize> CircuitProof<DEPTH> {
    /// Prove `key` against the tree's current root.
    pub fn from_tree<T: AuthenticatedTree + ?Sized>(
        tree: &T,
        key: FieldElement,
    ) -> Result<Self, SerializeError> {
        let (proof, value) = tree.generate_proof(key)?;
        serialize_proof(&proof, tree.root(), key, value)
    }

    /// Which aux case this proof encodes.
    pub fn aux(&self) -> AuxNode {
        aux_from_fields(self.existence, self.aux_existence, self.aux_index, self.aux_value)
    }

    /// Strip the padding and recover the native proof.
    pub fn to_proof(&self) -> Proof {
        to_native(self.existence, &self.siblings, self.aux())
    }

    /// Recompute the root and compare.
    pub fn verify<H: FieldHasher>(&self) -> bool {
        verify_proof::<H>(&self.root, &self.to_proof(), &self.index, &self.value)
    }
}

/// A padded proof whose depth is chosen at runtime.
///
/// Same JSON shape as `CircuitProof`. `siblings.len()` is always the depth
/// it was serialized with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedProof {
    /// Root the proof is against.
    pub root: Hash,
    /// Whether `index` is in the tree.
    pub existence: bool,
    /// Siblings, root level first, zero-padded.
    pub siblings: Vec<Hash>,
    /// Queried key.
    pub index: FieldElement,
    /// Value found at the key, the colliding leaf's value, or zero.
    pub value: FieldElement,
    /// Whether a different leaf occupies the key's position.
    pub aux_existence: bool,
    /// The colliding leaf's key, or zero.
    pub aux_index: Hash,
    /// The colliding leaf's value, or zero.
    pub aux_value: Hash,
}

/// Pad a native proof to `max_depth` siblings.
pub fn serialize_proof_dyn(
    proof: &Proof,
    root: Hash,
    index: FieldElement,
    value: FieldElement,
    max_depth: usize,
) -> Result<SerializedProof, SerializeError> {
    check_depth(proof, max_depth)?;
    let mut siblings = Vec::with_capacity(max_depth);
    siblings.extend_from_slice(&proof.siblings);
    siblings.resize(max_depth, Hash::ZERO);

    let (aux_existence, aux_index, aux_value) = AuxNode::from_proof(proof).to_fields();
    Ok(SerializedProof {
        root,
        existence: proof.existence,
        siblings,
        index,
        value,
        aux_existence,
        aux_index,
        aux_value,
    })
}

impl SerializedProof {
    /// Which aux case this proof encodes.
    pub fn aux(&self) -> AuxNode {
        aux_from_fields(self.existence, self.aux_existence, self.aux_index, self.aux_value)
    }

    /// Strip the padding and recover the native proof.
    pub fn to_proof(&self) -> Proof {
        to_native(self.existence, &self.siblings, self.aux())
    }

    /// Recompute the root and compare.
    pub fn verify<H: FieldHasher>(&self) -> bool {
        verify_proof::<H>(&self.root, &self.to_proof(), &self.index, &self.value)
    }
}

impl<const DEPTH: usize> From<CircuitProof<DEPTH>> for SerializedProof {
    fn from(p: CircuitProof<DEPTH>) -> Self {
        Self {
            root: p.root,
            existence: p.existence,
            siblings: p.siblings.to_vec(),
            index: p.index,
            value: p.value,
            aux_existence: p.aux_existence,
            aux_index: p.aux_index,
            aux_value: p.aux_value,
        }
    }
}

fn check_depth(proof: &Proof, max: usize) -> Result<(), SerializeError> {
    let actual = proof.siblings.len();
    if actual > max {
        return Err(SerializeError::DepthExceeded { actual, max });
    }
    Ok(())
}

fn aux_from_fields(existence: bool, aux_existence: bool, key: Hash, value: Hash) -> AuxNode {
    match (existence, aux_existence) {
        (true, _) => AuxNode::Inclusion,
        (false, true) => AuxNode::Collision { key, value },
        (false, false) => AuxNode::Empty,
    }
}

// The last real sibling is never empty, so trailing zeros are all padding.
fn to_native(existence: bool, padded: &[Hash], aux: AuxNode) -> Proof {
    let len = padded.iter().rposition(|h| !h.is_zero()).map_or(0, |i| i + 1);
    let node_aux = match aux {
        AuxNode::Collision { key, value } => Some(NodeAux { key, value }),
        AuxNode::Inclusion | AuxNode::Empty => None,
    };
    Proof {
        existence,
        siblings: padded[..len].to_vec(),
        node_aux,
    }
}
