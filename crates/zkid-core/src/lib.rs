//! # zkid-core — Foundational Types for zkid
//!
//! Every numeric value that crosses a zkid boundary (claim slots, tree keys,
//! node hashes) is an element of the BN254 scalar field. This crate
//! defines those values once, with validated constructors, so that no other
//! crate ever handles a raw 256-bit integer that might exceed the modulus.
//!
//! ## Key Design Principles
//!
//! 1. **Field safety at construction.** `FieldElement`, `Slot` and `Hash`
//!    reject values `>= FIELD_MODULUS` when built. Nothing is wrapped or
//!    truncated after the fact.
//!
//! 2. **Decimal strings on the wire.** All three types serialize as base-10
//!    strings; JSON has no 256-bit integer type and circuit tooling parses
//!    arbitrary-precision decimal literals.
//!
//! 3. **Hashing is an interface.** `FieldHasher` is a stateless trait of
//!    associated functions. Backends live in `zkid-crypto`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `zkid-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod field;
pub mod hash;
pub mod serde_array;
pub mod slot;

// Re-export primary types for ergonomic imports.
pub use error::{FieldError, HashError};
pub use field::{FieldElement, FIELD_MODULUS};
pub use hash::{FieldHasher, Hash};
pub use slot::Slot;

/// 256-bit unsigned integer used for all field arithmetic.
pub use ruint::aliases::U256;
