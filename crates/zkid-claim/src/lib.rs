//! # zkid-claim — Identity Claim Codec
//!
//! A claim is a fixed 256-byte statement about an identity: eight 32-byte
//! slots, four "index" slots (what the claim is about) and four "value"
//! slots (what it says). Each slot is a BN254 field element, so a claim
//! hashes directly with Poseidon and can be consumed by a circuit or a
//! contract without variable-length parsing.
//!
//! ## Layout
//!
//! All slot integers are little-endian.
//!
//! | Slot | Contents |
//! |------|----------|
//! | 0 | schema hash (bytes 0..16), flags (byte 16), version (bytes 20..24) |
//! | 1 | identity, when placed in the index |
//! | 2, 3 | index data A, B; merklized root at index replaces A |
//! | 4 | revocation nonce (bytes 0..8), expiration (bytes 8..16) |
//! | 5 | identity, when placed in the value |
//! | 6, 7 | value data A, B; merklized root at value replaces A |
//!
//! Flag byte: bits 0..3 subject (`000` none, `010` identity in index,
//! `011` identity in value), bit 3 expirable, bit 4 updatable, bits 5..8
//! merklized position (`000` none, `001` index, `010` value).
//!
//! ## Construction
//!
//! `Claim::builder(schema)` collects fields; `build()` validates them all at
//! once and either returns a complete `Claim` or an error. A built claim is
//! immutable and every accessor decodes from the slots.
//!
//! ## Crate Policy
//!
//! - Depends on `zkid-core` only. Hashing is generic over `FieldHasher`.
//! - No `unsafe`, no panics outside tests.

pub mod builder;
pub mod claim;
pub mod error;
pub mod id;
pub mod schema;
pub mod vector;

pub use builder::ClaimBuilder;
pub use claim::{Claim, IdPosition, MerklizedRootPosition};
pub use error::ClaimError;
pub use id::Id;
pub use schema::SchemaHash;
pub use vector::ClaimVector;
