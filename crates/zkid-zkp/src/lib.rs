//! # zkid-zkp — Circuit Proof Forms
//!
//! Converts the tree's variable-length proofs into the fixed-shape records
//! a zero-knowledge circuit or its test harness consumes.
//!
//! ## Architecture
//!
//! - **Serializer** (`serializer.rs`): `CircuitProof<DEPTH>` pads siblings to
//!   exactly `DEPTH` entries and resolves the auxiliary leaf into one of
//!   three mutually exclusive cases (`AuxNode`). `SerializedProof` is the
//!   runtime-depth equivalent.
//!
//! - **Circom** (`circom.rs`): `CircomVerifierProof<DEPTH>`, the input shape
//!   of circomlib's `SMTVerifier` (`oldKey`, `oldValue`, `isOld0`, `fnc`),
//!   and its runtime-depth equivalent `SerializedCircomProof`.
//!
//! ## Security Invariant
//!
//! A proof is never truncated. If the tree's path is deeper than the target
//! depth, serialization fails with `SerializeError::DepthExceeded`.
//!
//! Padding uses `Hash::ZERO`, which is also the empty-subtree hash. A real
//! sibling at the last level of a path is never empty, so trailing zeros are
//! padding without ambiguity.
//!
//! ## Crate Policy
//!
//! - Depends on `zkid-core` and `zkid-crypto` internally.
//! - Pure transformations; no logging, no I/O.

pub mod circom;
pub mod error;
pub mod serializer;

pub use circom::{CircomVerifierProof, SerializedCircomProof};
pub use error::SerializeError;
pub use serializer::{serialize_proof, serialize_proof_dyn, AuxNode, CircuitProof, SerializedProof};
