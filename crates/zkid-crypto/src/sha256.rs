//! # SHA-256 Field Hasher
//!
//! SHA-256 over the concatenated 32-byte big-endian encodings of the inputs,
//! reduced modulo the field. Deterministic and cheap natively; expensive in a
//! circuit. Trees built with it will not verify against circom verifiers.

use sha2::{Digest, Sha256};

use zkid_core::{FieldElement, FieldHasher, HashError, FIELD_MODULUS, U256};

/// SHA-256 reduced into the BN254 scalar field.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256FieldHasher;

impl FieldHasher for Sha256FieldHasher {
    fn hash(inputs: &[FieldElement]) -> Result<FieldElement, HashError> {
        let mut hasher = Sha256::new();
        for input in inputs {
            hasher.update(input.to_be_bytes());
        }
        let digest: [u8; 32] = hasher.finalize().into();
        let reduced = U256::from_be_bytes::<32>(digest) % FIELD_MODULUS;
        Ok(FieldElement::new(reduced)?)
    }
}
