//! # Tree Hashes and the Hasher Interface
//!
//! `Hash` is the digest of an authenticated-tree node. It is a field
//! element with one distinguished value, `Hash::ZERO`, standing for an empty
//! subtree and for padding in fixed-depth proofs.
//!
//! `FieldHasher` is a stateless hash over field elements. Node hashing is
//! defined once here on top of it:
//!
//! - leaf   = `hash(key, value, 1)`
//! - middle = `hash(left, right)`
//! - empty  = `Hash::ZERO`
//!
//! ## Security Invariant
//!
//! Padding relies on a real node hash never being zero. For Poseidon this
//! holds with overwhelming probability but is not proven.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::HashError;
use crate::field::FieldElement;

/// The digest of a tree node.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, std::hash::Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Hash(FieldElement);

impl Hash {
    /// The empty-subtree sentinel (HashZero).
    pub const ZERO: Self = Self(FieldElement::ZERO);

    /// Wrap a field element.
    pub const fn from_field(value: FieldElement) -> Self {
        Self(value)
    }

    /// The underlying field element.
    pub fn as_field(&self) -> FieldElement {
        self.0
    }

    /// True for `Hash::ZERO`.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<FieldElement> for Hash {
    fn from(value: FieldElement) -> Self {
        Self(value)
    }
}

impl From<Hash> for FieldElement {
    fn from(value: Hash) -> Self {
        value.0
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self.0)
    }
}

/// A deterministic hash from field elements to a field element.
pub trait FieldHasher: Send + Sync {
    /// Hash a sequence of field elements.
    fn hash(inputs: &[FieldElement]) -> Result<FieldElement, HashError>;

    /// Hash a leaf node.
    fn hash_leaf(key: &FieldElement, value: &FieldElement) -> Result<Hash, HashError> {
        Self::hash(&[*key, *value, FieldElement::ONE]).map(Hash::from)
    }

    /// Hash a middle node from its children.
    fn hash_middle(left: &Hash, right: &Hash) -> Result<Hash, HashError> {
        Self::hash(&[left.as_field(), right.as_field()]).map(Hash::from)
    }
}
