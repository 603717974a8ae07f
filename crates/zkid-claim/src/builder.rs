//! # Claim Builder
//!
//! Collects claim fields in any order and validates them together in
//! `build()`. Setters never fail; repeated calls to one setter keep the
//! last value. Every conflict is reported by `build()` whichever setter
//! ran first, and no partial claim is ever returned.

use chrono::{DateTime, Utc};

use zkid_core::{Slot, U256};

use crate::claim::{
    Claim, IdPosition, MerklizedRootPosition, EXPIRABLE_BIT, EXPIRATION_BYTES, FLAGS_BYTE,
    HEADER_SLOT, ID_INDEX_SLOT, ID_VALUE_SLOT, INDEX_A_SLOT, INDEX_B_SLOT, MERKLIZED_SHIFT,
    NONCE_BYTES, REVOCATION_SLOT, SCHEMA_BYTES, SLOT_COUNT, UPDATABLE_BIT, VALUE_A_SLOT,
    VALUE_B_SLOT, VERSION_BYTES,
};
use crate::error::ClaimError;
use crate::id::{Id, ID_LEN};
use crate::schema::SchemaHash;

/// Pending expiration, checked at build time.
#[derive(Debug, Clone, Copy)]
enum Expiration {
    Unix(u64),
    BeforeEpoch(i64),
}

/// Accumulates claim fields for a single validating `build()`.
#[derive(Debug, Clone)]
pub struct ClaimBuilder {
    schema: SchemaHash,
    id: Option<(Id, IdPosition)>,
    expiration: Option<Expiration>,
    updatable: bool,
    merklized_root: Option<(U256, MerklizedRootPosition)>,
    version: u32,
    revocation_nonce: u64,
    index_data: Option<(Slot, Slot)>,
    value_data: Option<(Slot, Slot)>,
}

impl ClaimBuilder {
    /// A builder with only the schema set.
    pub fn new(schema: SchemaHash) -> Self {
        Self {
            schema,
            id: None,
            expiration: None,
            updatable: false,
            merklized_root: None,
            version: 0,
            revocation_nonce: 0,
            index_data: None,
            value_data: None,
        }
    }

    /// Store the subject identity at `position`.
    pub fn with_id(mut self, id: Id, position: IdPosition) -> Self {
        self.id = Some((id, position));
        self
    }

    /// Make the claim expirable at `date`.
    pub fn with_expiration_date(mut self, date: DateTime<Utc>) -> Self {
        let secs = date.timestamp();
        self.expiration = Some(match u64::try_from(secs) {
            Ok(unix) => Expiration::Unix(unix),
            Err(_) => Expiration::BeforeEpoch(secs),
        });
        self
    }

    /// Make the claim expirable at `unix` seconds.
    pub fn with_expiration_unix(mut self, unix: u64) -> Self {
        self.expiration = Some(Expiration::Unix(unix));
        self
    }

    /// Set the updatable flag.
    pub fn with_flag_updatable(mut self, updatable: bool) -> Self {
        self.updatable = updatable;
        self
    }

    /// Store a merklized root at `position`.
    pub fn with_merklized_root(mut self, root: U256, position: MerklizedRootPosition) -> Self {
        self.merklized_root = Some((root, position));
        self
    }

    /// Set the version.
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Set the revocation nonce.
    pub fn with_revocation_nonce(mut self, nonce: u64) -> Self {
        self.revocation_nonce = nonce;
        self
    }

    /// Set index data slots A and B.
    pub fn with_index_data(mut self, a: Slot, b: Slot) -> Self {
        self.index_data = Some((a, b));
        self
    }

    /// Set value data slots A and B.
    pub fn with_value_data(mut self, a: Slot, b: Slot) -> Self {
        self.value_data = Some((a, b));
        self
    }

    /// Validate every field and encode the claim.
    pub fn build(self) -> Result<Claim, ClaimError> {
        self.check_conflicts()?;

        let mut slots = [Slot::ZERO; SLOT_COUNT];

        if let Some((a, b)) = self.index_data {
            slots[INDEX_A_SLOT] = a;
            slots[INDEX_B_SLOT] = b;
        }
        if let Some((a, b)) = self.value_data {
            slots[VALUE_A_SLOT] = a;
            slots[VALUE_B_SLOT] = b;
        }

        let id_position = match self.id {
            Some((id, position)) => {
                let target = match position {
                    IdPosition::Index => ID_INDEX_SLOT,
                    _ => ID_VALUE_SLOT,
                };
                let mut bytes = [0u8; 32];
                bytes[..ID_LEN].copy_from_slice(id.as_bytes());
                slots[target] = Slot::from_bytes(bytes)?;
                position
            }
            None => IdPosition::None,
        };

        let merklized_position = match self.merklized_root {
            Some((root, position)) => {
                let target = match position {
                    MerklizedRootPosition::Index => INDEX_A_SLOT,
                    _ => VALUE_A_SLOT,
                };
                slots[target] = Slot::from_int(root)?;
                position
            }
            None => MerklizedRootPosition::None,
        };

        let expiration = match self.expiration {
            Some(Expiration::Unix(unix)) => Some(unix),
            Some(Expiration::BeforeEpoch(secs)) => return Err(ClaimError::InvalidExpiration(secs)),
            None => None,
        };

        let mut flags = id_position.subject_bits() | (merklized_position.code() << MERKLIZED_SHIFT);
        if expiration.is_some() {
            flags |= EXPIRABLE_BIT;
        }
        if self.updatable {
            flags |= UPDATABLE_BIT;
        }

        let mut header = [0u8; 32];
        header[SCHEMA_BYTES].copy_from_slice(self.schema.as_bytes());
        header[FLAGS_BYTE] = flags;
        header[VERSION_BYTES].copy_from_slice(&self.version.to_le_bytes());
        slots[HEADER_SLOT] = Slot::from_bytes(header)?;

        let mut revocation = [0u8; 32];
        revocation[NONCE_BYTES].copy_from_slice(&self.revocation_nonce.to_le_bytes());
        revocation[EXPIRATION_BYTES].copy_from_slice(&expiration.unwrap_or(0).to_le_bytes());
        slots[REVOCATION_SLOT] = Slot::from_bytes(revocation)?;

        Ok(Claim::from_validated_slots(slots))
    }

    fn check_conflicts(&self) -> Result<(), ClaimError> {
        if let Some((_, IdPosition::None)) = self.id {
            return Err(ClaimError::InvalidPosition("identity"));
        }
        let root_position = match self.merklized_root {
            Some((_, MerklizedRootPosition::None)) => {
                return Err(ClaimError::InvalidPosition("merklized root"));
            }
            Some((_, position)) => position,
            None => return Ok(()),
        };

        let id_position = self.id.map(|(_, p)| p);
        match (id_position, root_position) {
            (Some(IdPosition::Index), MerklizedRootPosition::Index) => {
                return Err(conflict("index", "identity", "merklized root"));
            }
            (Some(IdPosition::Value), MerklizedRootPosition::Value) => {
                return Err(conflict("value", "identity", "merklized root"));
            }
            _ => {}
        }

        match root_position {
            MerklizedRootPosition::Index if self.index_data.is_some() => {
                Err(conflict("index", "merklized root", "index data"))
            }
            MerklizedRootPosition::Value if self.value_data.is_some() => {
                Err(conflict("value", "merklized root", "value data"))
            }
            _ => Ok(()),
        }
    }
}

fn conflict(position: &'static str, first: &'static str, second: &'static str) -> ClaimError {
    ClaimError::SlotConflict { position, first, second }
}
