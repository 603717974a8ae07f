//! Serde adapter for fixed-length arrays of any length.
//!
//! Use with `#[serde(with = "zkid_core::serde_array")]`. Serializes as a
//! sequence; deserializing rejects any sequence whose length is not `N`.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serialize `[T; N]` as a sequence.
pub fn serialize<S, T, const N: usize>(array: &[T; N], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    serializer.collect_seq(array.iter())
}

/// Deserialize a sequence of exactly `N` elements.
pub fn deserialize<'de, D, T, const N: usize>(deserializer: D) -> Result<[T; N], D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let items = Vec::<T>::deserialize(deserializer)?;
    let len = items.len();
    items.try_into().map_err(|_| {
        let expected = format!("a sequence of exactly {N} elements");
        D::Error::invalid_length(len, &expected.as_str())
    })
}
