//! # zkid-crypto — Hashing and the Authenticated Tree
//!
//! Provides the collaborators the claim codec and proof serializer consume:
//!
//! - **Poseidon** (`poseidon.rs`, feature `poseidon`): circomlib-compatible
//!   Poseidon over the BN254 scalar field, plus the 31-byte-chunk sponge used
//!   to hash arbitrary byte strings.
//!
//! - **SHA-256** (`sha256.rs`): SHA-256 reduced into the field. Not circuit
//!   friendly; useful where only determinism matters.
//!
//! - **Sparse Merkle tree** (`smt.rs`): in-memory binary tree keyed by field
//!   elements, with root history and proofs against historical roots.
//!
//! - **Proofs** (`proof.rs`): native variable-length proofs and root
//!   recomputation.
//!
//! ## Crate Policy
//!
//! - Depends on `zkid-core` only.
//! - Hashers are stateless types implementing `zkid_core::FieldHasher`.
//! - No logging; every failure is returned to the caller.

#[cfg(feature = "poseidon")]
pub mod poseidon;
pub mod proof;
pub mod sha256;
pub mod smt;

#[cfg(feature = "poseidon")]
pub use poseidon::{poseidon_hash_bytes, PoseidonHasher};
pub use proof::{verify_proof, NodeAux, Proof, ProofError};
pub use sha256::Sha256FieldHasher;
pub use smt::{AuthenticatedTree, MemoryTree, Node, RootInfo, TreeError, DEFAULT_MAX_DEPTH};
