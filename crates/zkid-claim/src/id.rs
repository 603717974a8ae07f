//! # Identity References
//!
//! An identity is 31 bytes: a 2-byte type, a 27-byte genesis, and a
//! 2-byte checksum. The checksum is the little-endian `u16` sum of the
//! preceding 29 bytes. Its integer form (little-endian) always fits in
//! a slot.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use zkid_core::FieldElement;

use crate::error::ClaimError;

/// Identity length in bytes.
pub const ID_LEN: usize = 31;

const CHECKSUM_OFFSET: usize = 29;

/// A checksummed 31-byte identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id([u8; ID_LEN]);

impl Id {
    /// Assemble an identity from its type and genesis, computing the checksum.
    pub fn from_parts(id_type: [u8; 2], genesis: [u8; 27]) -> Self {
        let mut bytes = [0u8; ID_LEN];
        bytes[..2].copy_from_slice(&id_type);
        bytes[2..CHECKSUM_OFFSET].copy_from_slice(&genesis);
        let sum = checksum(&bytes);
        bytes[CHECKSUM_OFFSET..].copy_from_slice(&sum.to_le_bytes());
        Self(bytes)
    }

    /// Validate raw identity bytes.
    pub fn from_bytes(bytes: [u8; ID_LEN]) -> Result<Self, ClaimError> {
        let stored = u16::from_le_bytes([bytes[CHECKSUM_OFFSET], bytes[CHECKSUM_OFFSET + 1]]);
        let computed = checksum(&bytes);
        if stored != computed {
            return Err(ClaimError::IdChecksum { stored, computed });
        }
        Ok(Self(bytes))
    }

    /// Validate an identity's integer form.
    pub fn from_int(value: FieldElement) -> Result<Self, ClaimError> {
        let le = value.to_le_bytes();
        if le[ID_LEN] != 0 {
            return Err(ClaimError::IdOverflow(value));
        }
        let mut bytes = [0u8; ID_LEN];
        bytes.copy_from_slice(&le[..ID_LEN]);
        Self::from_bytes(bytes)
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.0
    }

    /// The 2-byte identity type.
    pub fn id_type(&self) -> [u8; 2] {
        [self.0[0], self.0[1]]
    }

    /// The integer form.
    pub fn to_field(&self) -> FieldElement {
        // 31 bytes never reach the modulus.
        FieldElement::from_le_slice(&self.0).unwrap_or(FieldElement::ZERO)
    }
}

fn checksum(bytes: &[u8; ID_LEN]) -> u16 {
    bytes[..CHECKSUM_OFFSET]
        .iter()
        .fold(0u16, |acc, b| acc.wrapping_add(u16::from(*b)))
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_field())
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.to_field())
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_field().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = FieldElement::deserialize(deserializer)?;
        Self::from_int(value).map_err(serde::de::Error::custom)
    }
}
