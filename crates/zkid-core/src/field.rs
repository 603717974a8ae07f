//! # Field Elements
//!
//! `FieldElement` is a 256-bit unsigned integer strictly less than the
//! BN254 scalar field modulus `r`. It is the numeric domain of every hash
//! input and output, every claim slot, and every tree key.
//!
//! ## Security Invariant
//!
//! There is no way to obtain a `FieldElement` holding a value `>= r`. Every
//! constructor that accepts caller input is fallible; the infallible ones
//! (`from_u64`, `from_u128`) take inputs that fit below `r` by width.
//!
//! ## Serialization
//!
//! Serializes as a base-10 string. Deserializes from a base-10 string or a
//! JSON integer that fits in `u64`.

use std::fmt;
use std::str::FromStr;

use ruint::aliases::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FieldError;

/// The BN254 scalar field modulus
/// `21888242871839275222246405745257275088548364400416034343698204186575808495617`.
pub const FIELD_MODULUS: U256 = U256::from_limbs([
    0x43e1_f593_f000_0001,
    0x2833_e848_79b9_7091,
    0xb850_45b6_8181_585d,
    0x3064_4e72_e131_a029,
]);

/// An integer in `[0, FIELD_MODULUS)`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FieldElement(U256);

impl FieldElement {
    /// The additive identity.
    pub const ZERO: Self = Self(U256::ZERO);

    /// The multiplicative identity.
    pub const ONE: Self = Self(U256::from_limbs([1, 0, 0, 0]));

    /// Validate a 256-bit integer against the field modulus.
    pub fn new(value: U256) -> Result<Self, FieldError> {
        if value >= FIELD_MODULUS {
            return Err(FieldError::FieldOverflow(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Build from a `u64`. Always field-safe.
    pub const fn from_u64(value: u64) -> Self {
        Self(U256::from_limbs([value, 0, 0, 0]))
    }

    /// Build from a `u128`. Always field-safe.
    pub const fn from_u128(value: u128) -> Self {
        Self(U256::from_limbs([value as u64, (value >> 64) as u64, 0, 0]))
    }

    /// Decode 32 little-endian bytes.
    pub fn from_le_bytes(bytes: [u8; 32]) -> Result<Self, FieldError> {
        Self::new(U256::from_le_bytes::<32>(bytes))
    }

    /// Decode 32 big-endian bytes.
    pub fn from_be_bytes(bytes: [u8; 32]) -> Result<Self, FieldError> {
        Self::new(U256::from_le_bytes::<32>(reversed(bytes)))
    }

    /// Decode up to 32 little-endian bytes, zero-extending on the high end.
    pub fn from_le_slice(bytes: &[u8]) -> Result<Self, FieldError> {
        if bytes.len() > 32 {
            return Err(FieldError::ByteLength(bytes.len()));
        }
        let mut buf = [0u8; 32];
        buf[..bytes.len()].copy_from_slice(bytes);
        Self::from_le_bytes(buf)
    }

    /// Parse a base-10 integer string. Only ASCII digits are accepted; the
    /// empty string, signs, separators and whitespace are rejected.
    pub fn from_dec_str(s: &str) -> Result<Self, FieldError> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FieldError::Parse {
                input: s.to_string(),
                reason: "expected one or more decimal digits".to_string(),
            });
        }
        let value = U256::from_str_radix(s, 10).map_err(|e| FieldError::Parse {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        Self::new(value)
    }

    /// Little-endian 32-byte encoding.
    pub fn to_le_bytes(&self) -> [u8; 32] {
        self.0.to_le_bytes::<32>()
    }

    /// Big-endian 32-byte encoding.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        reversed(self.to_le_bytes())
    }

    /// The underlying integer.
    pub fn as_uint(&self) -> U256 {
        self.0
    }

    /// Bit `index`, counting from the least significant bit.
    pub fn bit(&self, index: usize) -> bool {
        index < 256 && self.0.bit(index)
    }

    /// True for the zero element.
    pub fn is_zero(&self) -> bool {
        self.0 == U256::ZERO
    }
}

fn reversed(mut bytes: [u8; 32]) -> [u8; 32] {
    bytes.reverse();
    bytes
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl TryFrom<U256> for FieldElement {
    type Error = FieldError;

    fn try_from(value: U256) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for FieldElement {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_dec_str(s)
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({})", self.0)
    }
}

impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DecimalVisitor;

        impl serde::de::Visitor<'_> for DecimalVisitor {
            type Value = FieldElement;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a base-10 field element string or unsigned integer")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                FieldElement::from_dec_str(v).map_err(E::custom)
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(FieldElement::from_u64(v))
            }
        }

        deserializer.deserialize_any(DecimalVisitor)
    }
}
