//! # Sparse Merkle Tree
//!
//! An in-memory binary sparse Merkle tree keyed by field elements, laid out
//! the way iden3 trees are:
//!
//! - the path of key `k` reads bit `i` of `k` at level `i`, least
//!   significant bit first, `1` meaning right;
//! - a leaf sits at the shallowest level where its path no longer shares a
//!   subtree with any other leaf;
//! - a leaf may sit at depth at most `max_depth`, so two keys whose first
//!   differing bit has index `>= max_depth` cannot coexist.
//!
//! Nodes are stored by hash and never removed, so every root the tree has
//! ever had stays provable. The root history starts with the empty root
//! and gains one entry per successful mutation.
//!
//! ## Security Invariant
//!
//! A failed mutation leaves the root and the history untouched. Nodes
//! written before the failure are unreachable from any recorded root.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use serde::Serialize;
use thiserror::Error;

use zkid_core::{FieldElement, FieldHasher, Hash, HashError};

use crate::proof::{NodeAux, Proof};

/// Depth used by the on-chain verifier and the vector tooling.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// No configurable depth may exceed this.
pub const MAX_DEPTH_HARD_CAP: usize = 256;

/// Largest page `root_history` returns.
pub const ROOT_HISTORY_PAGE_LIMIT: usize = 1000;

/// Error in tree operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// `add` on a key that already has a leaf.
    #[error("key {0} already exists")]
    KeyExists(FieldElement),

    /// `update` on a key that has no leaf.
    #[error("key {0} not found")]
    KeyNotFound(FieldElement),

    /// The insertion would place a leaf deeper than `max_depth`.
    #[error("max depth reached: key {key} needs more than {max_depth} levels")]
    MaxDepthReached {
        /// Key being inserted.
        key: FieldElement,
        /// Configured depth limit.
        max_depth: usize,
    },

    /// The root was never a root of this tree.
    #[error("root {0} does not exist")]
    RootNotFound(Hash),

    /// A node referenced by a reachable parent is missing from storage.
    #[error("node {0} missing from storage")]
    NodeNotFound(Hash),

    /// Rejected `max_depth` value.
    #[error("invalid max depth {requested}: {reason}")]
    InvalidMaxDepth {
        /// Requested depth.
        requested: usize,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Rejected root-history page request.
    #[error("invalid root history range: {0}")]
    HistoryRange(&'static str),

    /// Hash backend failure.
    #[error("hash error: {0}")]
    Hash(#[from] HashError),
}

/// A tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    /// No leaf below this point.
    Empty,
    /// A key/value pair.
    Leaf {
        /// Leaf key.
        key: FieldElement,
        /// Leaf value.
        value: FieldElement,
    },
    /// An inner node.
    Middle {
        /// Hash of the bit-0 child.
        left: Hash,
        /// Hash of the bit-1 child.
        right: Hash,
    },
}

impl Node {
    /// Hash this node with `H`.
    pub fn hash<H: FieldHasher>(&self) -> Result<Hash, HashError> {
        match self {
            Node::Empty => Ok(Hash::ZERO),
            Node::Leaf { key, value } => H::hash_leaf(key, value),
            Node::Middle { left, right } => H::hash_middle(left, right),
        }
    }
}

/// One entry of the root history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RootInfo {
    /// The root.
    pub root: Hash,
    /// The root that replaced it, or `None` for the current root.
    pub replaced_by_root: Option<Hash>,
    /// Index of this entry in the history.
    pub position: usize,
}

/// The operations a proof producer needs from an authenticated tree.
pub trait AuthenticatedTree {
    /// Insert a new leaf.
    fn add(&mut self, key: FieldElement, value: FieldElement) -> Result<(), TreeError>;

    /// Prove inclusion or non-inclusion of `key` against the current root.
    ///
    /// Returns the proof and the value found: the key's value, the
    /// auxiliary leaf's value, or zero.
    fn generate_proof(&self, key: FieldElement) -> Result<(Proof, FieldElement), TreeError>;

    /// The current root.
    fn root(&self) -> Hash;
}

/// An in-memory sparse Merkle tree hashed with `H`.
pub struct MemoryTree<H> {
    nodes: HashMap<Hash, Node>,
    root: Hash,
    history: Vec<Hash>,
    max_depth: usize,
    _hasher: PhantomData<fn() -> H>,
}

impl<H> fmt::Debug for MemoryTree<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryTree")
            .field("root", &self.root)
            .field("max_depth", &self.max_depth)
            .field("nodes", &self.nodes.len())
            .field("history", &self.history.len())
            .finish()
    }
}

impl<H: FieldHasher> Default for MemoryTree<H> {
    fn default() -> Self {
        Self::empty(DEFAULT_MAX_DEPTH)
    }
}

impl<H: FieldHasher> MemoryTree<H> {
    /// Create an empty tree.
    pub fn new(max_depth: usize) -> Result<Self, TreeError> {
        check_depth_bounds(max_depth)?;
        Ok(Self::empty(max_depth))
    }

    fn empty(max_depth: usize) -> Self {
        Self {
            nodes: HashMap::new(),
            root: Hash::ZERO,
            history: vec![Hash::ZERO],
            max_depth,
            _hasher: PhantomData,
        }
    }

    /// The current root.
    pub fn root(&self) -> Hash {
        self.root
    }

    /// The configured depth limit.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Raise the depth limit. Lowering it, or leaving it unchanged, is rejected.
    pub fn set_max_depth(&mut self, max_depth: usize) -> Result<(), TreeError> {
        check_depth_bounds(max_depth)?;
        if max_depth <= self.max_depth {
            return Err(TreeError::InvalidMaxDepth {
                requested: max_depth,
                reason: "max depth can only be increased",
            });
        }
        self.max_depth = max_depth;
        Ok(())
    }

    /// Insert `key` with `value`. Fails with `KeyExists` if the key is present.
    pub fn add(&mut self, key: FieldElement, value: FieldElement) -> Result<(), TreeError> {
        let root = self.add_leaf(key, value, self.root, 0)?;
        self.commit(root);
        Ok(())
    }

    /// Replace the value of an existing key.
    pub fn update(&mut self, key: FieldElement, value: FieldElement) -> Result<(), TreeError> {
        let root = self.update_leaf(key, value, self.root, 0)?;
        self.commit(root);
        Ok(())
    }

    /// Insert, or overwrite if the key is present.
    pub fn add_or_update(&mut self, key: FieldElement, value: FieldElement) -> Result<(), TreeError> {
        match self.add(key, value) {
            Err(TreeError::KeyExists(_)) => self.update(key, value),
            other => other,
        }
    }

    /// The value stored under `key`, if any.
    pub fn get(&self, key: FieldElement) -> Result<Option<FieldElement>, TreeError> {
        let (proof, value) = self.generate_proof(key)?;
        Ok(proof.existence.then_some(value))
    }

    /// Prove `key` against the current root.
    pub fn generate_proof(&self, key: FieldElement) -> Result<(Proof, FieldElement), TreeError> {
        self.walk(key, self.root)
    }

    /// Prove `key` against any root this tree has had.
    pub fn generate_proof_at_root(
        &self,
        key: FieldElement,
        root: Hash,
    ) -> Result<(Proof, FieldElement), TreeError> {
        if !self.history.contains(&root) {
            return Err(TreeError::RootNotFound(root));
        }
        self.walk(key, root)
    }

    /// Number of entries in the root history.
    pub fn root_history_len(&self) -> usize {
        self.history.len()
    }

    /// A page of the root history, oldest first.
    ///
    /// The page is clamped at the end of the history.
    pub fn root_history(&self, start: usize, length: usize) -> Result<Vec<RootInfo>, TreeError> {
        if length == 0 {
            return Err(TreeError::HistoryRange("length should be greater than 0"));
        }
        if length > ROOT_HISTORY_PAGE_LIMIT {
            return Err(TreeError::HistoryRange("length limit exceeded"));
        }
        if start >= self.history.len() {
            return Err(TreeError::HistoryRange("start index out of bounds"));
        }
        let end = start.saturating_add(length).min(self.history.len());
        Ok((start..end).map(|i| self.info_at(i)).collect())
    }

    /// History entry for the most recent occurrence of `root`.
    pub fn root_info(&self, root: Hash) -> Result<RootInfo, TreeError> {
        self.history
            .iter()
            .rposition(|r| *r == root)
            .map(|i| self.info_at(i))
            .ok_or(TreeError::RootNotFound(root))
    }

    fn info_at(&self, position: usize) -> RootInfo {
        RootInfo {
            root: self.history[position],
            replaced_by_root: self.history.get(position + 1).copied(),
            position,
        }
    }

    fn commit(&mut self, root: Hash) {
        self.root = root;
        self.history.push(root);
    }

    fn node(&self, hash: &Hash) -> Result<Node, TreeError> {
        if hash.is_zero() {
            return Ok(Node::Empty);
        }
        self.nodes
            .get(hash)
            .copied()
            .ok_or(TreeError::NodeNotFound(*hash))
    }

    fn put(&mut self, node: Node) -> Result<Hash, TreeError> {
        let hash = node.hash::<H>()?;
        if node != Node::Empty {
            self.nodes.insert(hash, node);
        }
        Ok(hash)
    }

    fn add_leaf(
        &mut self,
        key: FieldElement,
        value: FieldElement,
        at: Hash,
        level: usize,
    ) -> Result<Hash, TreeError> {
        if level > self.max_depth {
            return Err(self.depth_error(key));
        }
        match self.node(&at)? {
            Node::Empty => self.put(Node::Leaf { key, value }),
            Node::Leaf { key: existing, .. } => {
                if existing == key {
                    return Err(TreeError::KeyExists(key));
                }
                self.push_leaf(key, value, existing, at, level)
            }
            Node::Middle { left, right } => {
                let node = if key.bit(level) {
                    let right = self.add_leaf(key, value, right, level + 1)?;
                    Node::Middle { left, right }
                } else {
                    let left = self.add_leaf(key, value, left, level + 1)?;
                    Node::Middle { left, right }
                };
                self.put(node)
            }
        }
    }

    /// Split an occupied position until the new and the old leaf diverge.
    fn push_leaf(
        &mut self,
        key: FieldElement,
        value: FieldElement,
        old_key: FieldElement,
        old_hash: Hash,
        level: usize,
    ) -> Result<Hash, TreeError> {
        if level >= self.max_depth {
            return Err(self.depth_error(key));
        }
        let bit = key.bit(level);
        if bit == old_key.bit(level) {
            let child = self.push_leaf(key, value, old_key, old_hash, level + 1)?;
            let node = if bit {
                Node::Middle { left: Hash::ZERO, right: child }
            } else {
                Node::Middle { left: child, right: Hash::ZERO }
            };
            return self.put(node);
        }
        let new_hash = self.put(Node::Leaf { key, value })?;
        let node = if bit {
            Node::Middle { left: old_hash, right: new_hash }
        } else {
            Node::Middle { left: new_hash, right: old_hash }
        };
        self.put(node)
    }

    fn update_leaf(
        &mut self,
        key: FieldElement,
        value: FieldElement,
        at: Hash,
        level: usize,
    ) -> Result<Hash, TreeError> {
        match self.node(&at)? {
            Node::Empty => Err(TreeError::KeyNotFound(key)),
            Node::Leaf { key: existing, .. } if existing == key => {
                self.put(Node::Leaf { key, value })
            }
            Node::Leaf { .. } => Err(TreeError::KeyNotFound(key)),
            Node::Middle { left, right } => {
                let node = if key.bit(level) {
                    let right = self.update_leaf(key, value, right, level + 1)?;
                    Node::Middle { left, right }
                } else {
                    let left = self.update_leaf(key, value, left, level + 1)?;
                    Node::Middle { left, right }
                };
                self.put(node)
            }
        }
    }

    fn walk(&self, key: FieldElement, root: Hash) -> Result<(Proof, FieldElement), TreeError> {
        let mut siblings = Vec::new();
        let mut next = root;
        for level in 0..=self.max_depth {
            match self.node(&next)? {
                Node::Empty => {
                    let proof = Proof { existence: false, siblings, node_aux: None };
                    return Ok((proof, FieldElement::ZERO));
                }
                Node::Leaf { key: found, value } => {
                    let node_aux = (found != key).then(|| NodeAux {
                        key: Hash::from(found),
                        value: Hash::from(value),
                    });
                    let proof = Proof { existence: node_aux.is_none(), siblings, node_aux };
                    return Ok((proof, value));
                }
                Node::Middle { left, right } => {
                    if key.bit(level) {
                        siblings.push(left);
                        next = right;
                    } else {
                        siblings.push(right);
                        next = left;
                    }
                }
            }
        }
        Err(self.depth_error(key))
    }

    fn depth_error(&self, key: FieldElement) -> TreeError {
        TreeError::MaxDepthReached { key, max_depth: self.max_depth }
    }
}

fn check_depth_bounds(max_depth: usize) -> Result<(), TreeError> {
    if max_depth == 0 {
        return Err(TreeError::InvalidMaxDepth {
            requested: max_depth,
            reason: "max depth must be greater than zero",
        });
    }
    if max_depth > MAX_DEPTH_HARD_CAP {
        return Err(TreeError::InvalidMaxDepth {
            requested: max_depth,
            reason: "max depth is greater than hard cap",
        });
    }
    Ok(())
}

impl<H: FieldHasher> AuthenticatedTree for MemoryTree<H> {
    fn add(&mut self, key: FieldElement, value: FieldElement) -> Result<(), TreeError> {
        MemoryTree::add(self, key, value)
    }

    fn generate_proof(&self, key: FieldElement) -> Result<(Proof, FieldElement), TreeError> {
        MemoryTree::generate_proof(self, key)
    }

    fn root(&self) -> Hash {
        MemoryTree::root(self)
    }
}
