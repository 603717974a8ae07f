//! Claim construction and decoding errors.

use thiserror::Error;

use zkid_core::{FieldElement, FieldError};

/// Error building or decoding a claim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClaimError {
    /// Two fields were routed to the same physical slots.
    #[error("slot conflict: {first} and {second} both target the {position} slots")]
    SlotConflict {
        /// `"index"` or `"value"`.
        position: &'static str,
        /// First claimant.
        first: &'static str,
        /// Second claimant.
        second: &'static str,
    },

    /// A value does not fit in a slot.
    #[error("field error: {0}")]
    Field(#[from] FieldError),

    /// An identity integer wider than 31 bytes.
    #[error("identity {0} exceeds 31 bytes")]
    IdOverflow(FieldElement),

    /// An identity whose trailing checksum does not match its body.
    #[error("identity checksum mismatch: stored {stored:#06x}, computed {computed:#06x}")]
    IdChecksum {
        /// Checksum read from bytes 29..31.
        stored: u16,
        /// Checksum of bytes 0..29.
        computed: u16,
    },

    /// `None` passed where a placement is required.
    #[error("{0} position must be Index or Value")]
    InvalidPosition(&'static str),

    /// Raw slots the encoder cannot produce: an unknown header code, or
    /// nonzero bytes outside every encoded field.
    #[error("invalid claim encoding: {0}")]
    InvalidHeader(String),

    /// An expiration date before 1970-01-01T00:00:00Z.
    #[error("expiration date {0} is before the unix epoch")]
    InvalidExpiration(i64),
}
