//! # Poseidon — circom-compatible hashing over BN254
//!
//! Wraps `light-poseidon`'s circom parameter set, which matches circomlib and
//! the iden3 toolchain bit for bit. Inputs and outputs are converted between
//! `FieldElement` and arkworks `Fr` through their little-endian encodings.
//!
//! ## Byte sponge
//!
//! `poseidon_hash_bytes` hashes an arbitrary byte string by cutting it into
//! 31-byte little-endian chunks (each below 2^248, so always field-safe) and
//! absorbing `frame_size` chunks per permutation. After each full frame the
//! output is chained into position 0 of the next frame.

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use light_poseidon::{Poseidon, PoseidonHasher as _};

use zkid_core::{FieldElement, FieldHasher, HashError};

/// Largest input count the circom parameter set covers.
pub const MAX_INPUTS: usize = 12;

/// Bytes packed into one field element by the sponge.
pub const SPONGE_CHUNK_BYTES: usize = 31;

/// Poseidon over the BN254 scalar field with circom parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoseidonHasher;

impl FieldHasher for PoseidonHasher {
    fn hash(inputs: &[FieldElement]) -> Result<FieldElement, HashError> {
        if inputs.is_empty() || inputs.len() > MAX_INPUTS {
            return Err(HashError::Arity(inputs.len()));
        }
        let mut poseidon = Poseidon::<Fr>::new_circom(inputs.len())
            .map_err(|e| HashError::Backend(e.to_string()))?;
        let frs: Vec<Fr> = inputs.iter().map(to_fr).collect();
        let out = poseidon
            .hash(&frs)
            .map_err(|e| HashError::Backend(e.to_string()))?;
        from_fr(out)
    }
}

fn to_fr(value: &FieldElement) -> Fr {
    Fr::from_le_bytes_mod_order(&value.to_le_bytes())
}

fn from_fr(value: Fr) -> Result<FieldElement, HashError> {
    let bytes = value.into_bigint().to_bytes_le();
    Ok(FieldElement::from_le_slice(&bytes)?)
}

/// Hash a byte string with the Poseidon sponge.
///
/// `frame_size` is the number of elements per permutation and must lie in
/// `2..=MAX_INPUTS`. The empty message hashes to zero.
pub fn poseidon_hash_bytes(msg: &[u8], frame_size: usize) -> Result<FieldElement, HashError> {
    if !(2..=MAX_INPUTS).contains(&frame_size) {
        return Err(HashError::Arity(frame_size));
    }

    let mut frame = vec![FieldElement::ZERO; frame_size];
    let mut hash = FieldElement::ZERO;
    let mut dirty = false;
    let mut k = 0;

    let mut chunks = msg.chunks_exact(SPONGE_CHUNK_BYTES);
    for chunk in &mut chunks {
        frame[k] = FieldElement::from_le_slice(chunk)?;
        dirty = true;
        if k == frame_size - 1 {
            hash = PoseidonHasher::hash(&frame)?;
            dirty = false;
            frame.fill(FieldElement::ZERO);
            frame[0] = hash;
            k = 1;
        } else {
            k += 1;
        }
    }

    let tail = chunks.remainder();
    if !tail.is_empty() {
        frame[k] = FieldElement::from_le_slice(tail)?;
        dirty = true;
    }

    if dirty {
        hash = PoseidonHasher::hash(&frame)?;
    }
    Ok(hash)
}
