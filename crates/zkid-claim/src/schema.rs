//! # Schema Hash
//!
//! The 128-bit identifier of a claim's schema. Stored little-endian in the
//! low 16 bytes of slot 0, so its integer value is also the low 128 bits of
//! that slot.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use zkid_core::FieldElement;

/// A 128-bit schema identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SchemaHash([u8; 16]);

impl SchemaHash {
    /// From the schema's integer form.
    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_le_bytes())
    }

    /// From the 16 little-endian bytes stored in the claim.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// The integer form.
    pub const fn to_u128(&self) -> u128 {
        u128::from_le_bytes(self.0)
    }

    /// The stored bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// The integer form as a field element.
    pub fn to_field(&self) -> FieldElement {
        FieldElement::from_u128(self.to_u128())
    }
}

impl fmt::Display for SchemaHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_u128())
    }
}

impl fmt::Debug for SchemaHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SchemaHash({})", self.to_u128())
    }
}

impl Serialize for SchemaHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SchemaHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<u128>()
            .map(Self::from_u128)
            .map_err(serde::de::Error::custom)
    }
}
