//! # Error Types
//!
//! Errors raised by the field primitives. Higher crates wrap these with
//! `#[from]` rather than re-describing them.

use thiserror::Error;

/// Error constructing a field element or slot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The value is not strictly less than the BN254 scalar field modulus.
    #[error("field overflow: {0} is not less than the field modulus")]
    FieldOverflow(String),

    /// A byte input wider than one 32-byte field element.
    #[error("byte input of {0} bytes exceeds the 32-byte field width")]
    ByteLength(usize),

    /// The input is not a base-10 integer.
    #[error("invalid decimal integer {input:?}: {reason}")]
    Parse {
        /// The rejected input.
        input: String,
        /// Parser diagnostic.
        reason: String,
    },
}

/// Error raised by a `FieldHasher` backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HashError {
    /// The backend has no parameters for this many inputs.
    #[error("unsupported hash arity: {0} inputs")]
    Arity(usize),

    /// The backend failed internally.
    #[error("hash backend error: {0}")]
    Backend(String),

    /// The backend produced a value outside the field.
    #[error("hash output out of field: {0}")]
    Field(#[from] FieldError),
}
