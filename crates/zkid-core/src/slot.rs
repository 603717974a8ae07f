//! # Claim Slots
//!
//! A `Slot` is one 32-byte cell of an encoded claim. Its bytes are read as
//! a little-endian integer, and that integer is always a valid field
//! element. Construction enforces this; a `Slot` that exists is field-safe.

use std::fmt;

use ruint::aliases::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FieldError;
use crate::field::FieldElement;

/// A field-safe 32-byte little-endian data cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Slot([u8; 32]);

impl Slot {
    /// The all-zero slot.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Validate raw little-endian bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, FieldError> {
        FieldElement::from_le_bytes(bytes)?;
        Ok(Self(bytes))
    }

    /// Validate an integer.
    pub fn from_int(value: U256) -> Result<Self, FieldError> {
        FieldElement::new(value).map(Self::from_field)
    }

    /// Wrap an element that is already known to be field-safe.
    pub fn from_field(value: FieldElement) -> Self {
        Self(value.to_le_bytes())
    }

    /// The raw little-endian bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// The slot's integer value.
    pub fn to_field(&self) -> FieldElement {
        // Bytes were validated on the way in; re-validation cannot fail.
        FieldElement::from_le_bytes(self.0).unwrap_or(FieldElement::ZERO)
    }

    /// True when every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl From<FieldElement> for Slot {
    fn from(value: FieldElement) -> Self {
        Self::from_field(value)
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot({})", self.to_field())
    }
}

impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_field().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Slot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        FieldElement::deserialize(deserializer).map(Self::from_field)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::field::FIELD_MODULUS;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn constructed_slots_are_field_safe(bytes in proptest::array::uniform32(any::<u8>())) {
            match Slot::from_bytes(bytes) {
                Ok(slot) => prop_assert!(slot.to_field().as_uint() < FIELD_MODULUS),
                Err(_) => prop_assert!(U256::from_le_bytes::<32>(bytes) >= FIELD_MODULUS),
            }
        }
    }
}
