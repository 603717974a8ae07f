//! # Claim
//!
//! The encoded claim and its decoders. A `Claim` holds nothing but its eight
//! slots; every field is read back out of them. The header in slot 0 is
//! validated whenever a claim is constructed, so accessors never fail.

use std::fmt;

use chrono::{DateTime, Utc};

use zkid_core::{FieldElement, FieldHasher, HashError, Slot};

use crate::builder::ClaimBuilder;
use crate::error::ClaimError;
use crate::id::{Id, ID_LEN};
use crate::schema::SchemaHash;

/// Number of slots in a claim.
pub const SLOT_COUNT: usize = 8;

// Slot indices.
pub(crate) const HEADER_SLOT: usize = 0;
pub(crate) const ID_INDEX_SLOT: usize = 1;
pub(crate) const INDEX_A_SLOT: usize = 2;
pub(crate) const INDEX_B_SLOT: usize = 3;
pub(crate) const REVOCATION_SLOT: usize = 4;
pub(crate) const ID_VALUE_SLOT: usize = 5;
pub(crate) const VALUE_A_SLOT: usize = 6;
pub(crate) const VALUE_B_SLOT: usize = 7;

// Slot 0 byte layout.
pub(crate) const SCHEMA_BYTES: std::ops::Range<usize> = 0..16;
pub(crate) const FLAGS_BYTE: usize = 16;
pub(crate) const VERSION_BYTES: std::ops::Range<usize> = 20..24;

// Slot 4 byte layout.
pub(crate) const NONCE_BYTES: std::ops::Range<usize> = 0..8;
pub(crate) const EXPIRATION_BYTES: std::ops::Range<usize> = 8..16;

// Flag bits.
pub(crate) const SUBJECT_MASK: u8 = 0b0000_0111;
pub(crate) const EXPIRABLE_BIT: u8 = 1 << 3;
pub(crate) const UPDATABLE_BIT: u8 = 1 << 4;
pub(crate) const MERKLIZED_SHIFT: u8 = 5;

const SUBJECT_SELF: u8 = 0b000;
const SUBJECT_OTHER_INDEX: u8 = 0b010;
const SUBJECT_OTHER_VALUE: u8 = 0b011;

/// Where the subject identity is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IdPosition {
    /// The claim is about its issuer; no identity is stored.
    #[default]
    None,
    /// Identity in slot 1.
    Index,
    /// Identity in slot 5.
    Value,
}

impl IdPosition {
    /// Numeric code used in contract inputs: 0, 1, 2.
    pub fn code(self) -> u8 {
        match self {
            IdPosition::None => 0,
            IdPosition::Index => 1,
            IdPosition::Value => 2,
        }
    }

    pub(crate) fn subject_bits(self) -> u8 {
        match self {
            IdPosition::None => SUBJECT_SELF,
            IdPosition::Index => SUBJECT_OTHER_INDEX,
            IdPosition::Value => SUBJECT_OTHER_VALUE,
        }
    }

    fn from_subject_bits(bits: u8) -> Result<Self, ClaimError> {
        match bits {
            SUBJECT_SELF => Ok(IdPosition::None),
            SUBJECT_OTHER_INDEX => Ok(IdPosition::Index),
            SUBJECT_OTHER_VALUE => Ok(IdPosition::Value),
            other => Err(ClaimError::InvalidHeader(format!("unknown subject code {other:#05b}"))),
        }
    }
}

/// Where the merklized root is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MerklizedRootPosition {
    /// No merklized root.
    #[default]
    None,
    /// Root in slot 2.
    Index,
    /// Root in slot 6.
    Value,
}

impl MerklizedRootPosition {
    /// Numeric code used in contract inputs and in the flag byte: 0, 1, 2.
    pub fn code(self) -> u8 {
        match self {
            MerklizedRootPosition::None => 0,
            MerklizedRootPosition::Index => 1,
            MerklizedRootPosition::Value => 2,
        }
    }

    fn from_code(code: u8) -> Result<Self, ClaimError> {
        match code {
            0 => Ok(MerklizedRootPosition::None),
            1 => Ok(MerklizedRootPosition::Index),
            2 => Ok(MerklizedRootPosition::Value),
            other => Err(ClaimError::InvalidHeader(format!("unknown merklized code {other}"))),
        }
    }
}

/// An encoded identity claim.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Claim {
    slots: [Slot; SLOT_COUNT],
}

impl Claim {
    /// Start building a claim for `schema`.
    pub fn builder(schema: SchemaHash) -> ClaimBuilder {
        ClaimBuilder::new(schema)
    }

    /// Wrap slots produced by the builder. The header is trusted.
    pub(crate) fn from_validated_slots(slots: [Slot; SLOT_COUNT]) -> Self {
        Self { slots }
    }

    /// Decode a claim from its eight slot values.
    ///
    /// Rejects unknown header codes and identities with a bad checksum. The
    /// decoded fields are then re-encoded, and any byte the encoder would not
    /// have written (reserved header bytes, an expiration without the
    /// expirable flag, an identity slot the subject code does not select)
    /// fails with `InvalidHeader`.
    pub fn from_raw_slots(values: [FieldElement; SLOT_COUNT]) -> Result<Self, ClaimError> {
        let slots = values.map(Slot::from_field);
        let flags = slots[HEADER_SLOT].as_bytes()[FLAGS_BYTE];
        IdPosition::from_subject_bits(flags & SUBJECT_MASK)?;
        MerklizedRootPosition::from_code(flags >> MERKLIZED_SHIFT)?;

        let decoded = Self { slots };
        let id = match decoded.id_position() {
            IdPosition::None => None,
            IdPosition::Index => Some(Id::from_int(slots[ID_INDEX_SLOT].to_field())?),
            IdPosition::Value => Some(Id::from_int(slots[ID_VALUE_SLOT].to_field())?),
        };

        let reencoded = decoded
            .to_builder(id)
            .build()
            .map_err(|e| ClaimError::InvalidHeader(format!("fields do not re-encode: {e}")))?;
        if let Some(slot) = (0..SLOT_COUNT).find(|&i| reencoded.slots[i] != slots[i]) {
            return Err(ClaimError::InvalidHeader(format!(
                "slot {slot} holds bytes outside the claim's fields"
            )));
        }
        Ok(decoded)
    }

    /// A builder carrying every field read back out of the slots.
    fn to_builder(&self, id: Option<Id>) -> ClaimBuilder {
        let mut builder = Claim::builder(self.schema_hash())
            .with_flag_updatable(self.flag_updatable())
            .with_version(self.version())
            .with_revocation_nonce(self.revocation_nonce());
        if let Some(id) = id {
            builder = builder.with_id(id, self.id_position());
        }
        if let Some(unix) = self.expiration_unix() {
            builder = builder.with_expiration_unix(unix);
        }
        let position = self.merklized_position();
        if let Some(root) = self.merklized_root() {
            builder = builder.with_merklized_root(root.as_uint(), position);
        }
        if position != MerklizedRootPosition::Index {
            let (a, b) = self.index_data();
            builder = builder.with_index_data(a, b);
        }
        if position != MerklizedRootPosition::Value {
            let (a, b) = self.value_data();
            builder = builder.with_value_data(a, b);
        }
        builder
    }

    /// The eight slots.
    pub fn slots(&self) -> &[Slot; SLOT_COUNT] {
        &self.slots
    }

    /// The eight slot values, index slots first.
    pub fn to_raw_slots(&self) -> [FieldElement; SLOT_COUNT] {
        self.slots.map(|s| s.to_field())
    }

    /// Slots 0..4.
    pub fn index_slots(&self) -> [FieldElement; 4] {
        let raw = self.to_raw_slots();
        [raw[0], raw[1], raw[2], raw[3]]
    }

    /// Slots 4..8.
    pub fn value_slots(&self) -> [FieldElement; 4] {
        let raw = self.to_raw_slots();
        [raw[4], raw[5], raw[6], raw[7]]
    }

    fn header(&self) -> &[u8; 32] {
        self.slots[HEADER_SLOT].as_bytes()
    }

    fn flags(&self) -> u8 {
        self.header()[FLAGS_BYTE]
    }

    /// The schema hash.
    pub fn schema_hash(&self) -> SchemaHash {
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&self.header()[SCHEMA_BYTES]);
        SchemaHash::from_bytes(bytes)
    }

    /// Where the subject identity is stored.
    pub fn id_position(&self) -> IdPosition {
        // Validated at construction.
        IdPosition::from_subject_bits(self.flags() & SUBJECT_MASK).unwrap_or_default()
    }

    /// The subject identity, if stored.
    pub fn id(&self) -> Option<Id> {
        let slot = match self.id_position() {
            IdPosition::None => return None,
            IdPosition::Index => &self.slots[ID_INDEX_SLOT],
            IdPosition::Value => &self.slots[ID_VALUE_SLOT],
        };
        let mut bytes = [0u8; ID_LEN];
        bytes.copy_from_slice(&slot.as_bytes()[..ID_LEN]);
        Id::from_bytes(bytes).ok()
    }

    /// Whether the expiration date is meaningful.
    pub fn flag_expirable(&self) -> bool {
        self.flags() & EXPIRABLE_BIT != 0
    }

    /// Whether the issuer may replace this claim.
    pub fn flag_updatable(&self) -> bool {
        self.flags() & UPDATABLE_BIT != 0
    }

    /// Expiration in seconds since the unix epoch, if expirable.
    pub fn expiration_unix(&self) -> Option<u64> {
        self.flag_expirable()
            .then(|| read_u64(self.slots[REVOCATION_SLOT].as_bytes(), EXPIRATION_BYTES))
    }

    /// Expiration as a UTC timestamp, if expirable and representable.
    pub fn expiration_date(&self) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(self.expiration_unix()?).ok()?;
        DateTime::from_timestamp(secs, 0)
    }

    /// Where the merklized root is stored.
    pub fn merklized_position(&self) -> MerklizedRootPosition {
        // Validated at construction.
        MerklizedRootPosition::from_code(self.flags() >> MERKLIZED_SHIFT).unwrap_or_default()
    }

    /// The merklized root, if stored.
    pub fn merklized_root(&self) -> Option<FieldElement> {
        match self.merklized_position() {
            MerklizedRootPosition::None => None,
            MerklizedRootPosition::Index => Some(self.slots[INDEX_A_SLOT].to_field()),
            MerklizedRootPosition::Value => Some(self.slots[VALUE_A_SLOT].to_field()),
        }
    }

    /// The claim version.
    pub fn version(&self) -> u32 {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.header()[VERSION_BYTES]);
        u32::from_le_bytes(bytes)
    }

    /// The revocation nonce.
    pub fn revocation_nonce(&self) -> u64 {
        read_u64(self.slots[REVOCATION_SLOT].as_bytes(), NONCE_BYTES)
    }

    /// Index data slots A and B (slots 2 and 3).
    pub fn index_data(&self) -> (Slot, Slot) {
        (self.slots[INDEX_A_SLOT], self.slots[INDEX_B_SLOT])
    }

    /// Value data slots A and B (slots 6 and 7).
    pub fn value_data(&self) -> (Slot, Slot) {
        (self.slots[VALUE_A_SLOT], self.slots[VALUE_B_SLOT])
    }

    /// Hashes of the index half and the value half.
    pub fn hi_hv<H: FieldHasher>(&self) -> Result<(FieldElement, FieldElement), HashError> {
        let hi = H::hash(&self.index_slots())?;
        let hv = H::hash(&self.value_slots())?;
        Ok((hi, hv))
    }

    /// The claim hash `H(hi, hv)`, as stored in a claims tree.
    pub fn hash<H: FieldHasher>(&self) -> Result<FieldElement, HashError> {
        let (hi, hv) = self.hi_hv::<H>()?;
        H::hash(&[hi, hv])
    }
}

fn read_u64(bytes: &[u8; 32], range: std::ops::Range<usize>) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[range]);
    u64::from_le_bytes(buf)
}

impl fmt::Debug for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claim")
            .field("schema_hash", &self.schema_hash())
            .field("id_position", &self.id_position())
            .field("merklized_position", &self.merklized_position())
            .field("version", &self.version())
            .field("slots", &self.slots)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zkid_core::U256;

    const SCHEMA: u128 = 75118319212313495155413841331241344325;

    fn fixture_id() -> Id {
        Id::from_int(
            FieldElement::from_dec_str(
                "25425363284463910957419549722021124450832239517990785975889689633068548096",
            )
            .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn schema_only_claim_has_single_nonzero_slot() {
        let claim = Claim::builder(SchemaHash::from_u128(SCHEMA)).build().unwrap();
        let raw = claim.to_raw_slots();
        assert_eq!(raw[0], FieldElement::from_u128(SCHEMA));
        assert!(raw[1..].iter().all(FieldElement::is_zero));
        assert_eq!(claim.id_position(), IdPosition::None);
        assert_eq!(claim.id(), None);
        assert_eq!(claim.merklized_root(), None);
        assert_eq!(claim.expiration_unix(), None);
        assert_eq!(claim.expiration_date(), None);
        assert!(!claim.flag_updatable());
    }

    #[test]
    fn from_raw_slots_inverts_to_raw_slots() {
        let claim = Claim::builder(SchemaHash::from_u128(SCHEMA))
            .with_id(fixture_id(), IdPosition::Index)
            .with_expiration_unix(1857686340)
            .with_flag_updatable(true)
            .with_version(89220123)
            .with_revocation_nonce(3312445)
            .build()
            .unwrap();
        let decoded = Claim::from_raw_slots(claim.to_raw_slots()).unwrap();
        assert_eq!(decoded, claim);
        assert_eq!(decoded.id(), Some(fixture_id()));
        assert_eq!(decoded.version(), 89220123);
    }

    #[test]
    fn from_raw_slots_rejects_unknown_subject() {
        let mut bytes = [0u8; 32];
        // subject code 0b001 is unassigned.
        bytes[FLAGS_BYTE] = 0b001;
        let mut raw = [FieldElement::ZERO; SLOT_COUNT];
        raw[0] = FieldElement::from_le_bytes(bytes).unwrap();
        let err = Claim::from_raw_slots(raw).unwrap_err();
        assert!(matches!(err, ClaimError::InvalidHeader(_)));
    }

    #[test]
    fn from_raw_slots_rejects_unknown_merklized_code() {
        let mut bytes = [0u8; 32];
        bytes[FLAGS_BYTE] = 0b011 << MERKLIZED_SHIFT;
        let mut raw = [FieldElement::ZERO; SLOT_COUNT];
        raw[0] = FieldElement::from_le_bytes(bytes).unwrap();
        assert!(matches!(Claim::from_raw_slots(raw), Err(ClaimError::InvalidHeader(_))));
    }

    #[test]
    fn from_raw_slots_checks_identity() {
        let mut bytes = [0u8; 32];
        bytes[FLAGS_BYTE] = SUBJECT_OTHER_VALUE;
        let mut raw = [FieldElement::ZERO; SLOT_COUNT];
        raw[0] = FieldElement::from_le_bytes(bytes).unwrap();
        raw[ID_VALUE_SLOT] = FieldElement::from_u64(12345);
        assert!(matches!(
            Claim::from_raw_slots(raw),
            Err(ClaimError::IdChecksum { .. })
        ));
    }

    fn header_with(flags: u8) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[FLAGS_BYTE] = flags;
        bytes
    }

    fn raw_with_header(header: [u8; 32]) -> [FieldElement; SLOT_COUNT] {
        let mut raw = [FieldElement::ZERO; SLOT_COUNT];
        raw[HEADER_SLOT] = FieldElement::from_le_bytes(header).unwrap();
        raw
    }

    fn assert_invalid_header(raw: [FieldElement; SLOT_COUNT]) {
        let err = Claim::from_raw_slots(raw).unwrap_err();
        assert!(matches!(err, ClaimError::InvalidHeader(_)), "got {err:?}");
    }

    #[test]
    fn from_raw_slots_rejects_reserved_header_bytes() {
        for byte in [17, 18, 19, 24, 30] {
            let mut header = header_with(0);
            header[byte] = 0xAA;
            assert_invalid_header(raw_with_header(header));
        }
    }

    #[test]
    fn from_raw_slots_rejects_expiration_without_flag() {
        let mut raw = raw_with_header(header_with(0));
        let mut slot4 = [0u8; 32];
        slot4[EXPIRATION_BYTES.start] = 7;
        raw[REVOCATION_SLOT] = FieldElement::from_le_bytes(slot4).unwrap();
        assert_invalid_header(raw);
    }

    #[test]
    fn from_raw_slots_rejects_high_bytes_in_revocation_slot() {
        let mut raw = raw_with_header(header_with(EXPIRABLE_BIT));
        let mut slot4 = [0u8; 32];
        slot4[16] = 1;
        raw[REVOCATION_SLOT] = FieldElement::from_le_bytes(slot4).unwrap();
        assert_invalid_header(raw);
    }

    #[test]
    fn from_raw_slots_rejects_unselected_identity_slot() {
        let mut raw = raw_with_header(header_with(SUBJECT_SELF));
        raw[ID_INDEX_SLOT] = FieldElement::from_u64(5);
        assert_invalid_header(raw);

        let mut raw = raw_with_header(header_with(SUBJECT_OTHER_INDEX));
        raw[ID_INDEX_SLOT] = fixture_id().to_field();
        raw[ID_VALUE_SLOT] = FieldElement::from_u64(5);
        assert_invalid_header(raw);
    }

    #[test]
    fn from_raw_slots_rejects_identity_and_root_in_same_half() {
        let flags = SUBJECT_OTHER_INDEX | (MerklizedRootPosition::Index.code() << MERKLIZED_SHIFT);
        let mut raw = raw_with_header(header_with(flags));
        raw[ID_INDEX_SLOT] = fixture_id().to_field();
        raw[INDEX_A_SLOT] = FieldElement::from_u64(99);
        assert_invalid_header(raw);
    }

    #[test]
    fn from_raw_slots_rejects_data_beside_merklized_root() {
        let flags = MerklizedRootPosition::Value.code() << MERKLIZED_SHIFT;
        let mut raw = raw_with_header(header_with(flags));
        raw[VALUE_A_SLOT] = FieldElement::from_u64(99);
        raw[VALUE_B_SLOT] = FieldElement::from_u64(1);
        assert_invalid_header(raw);
    }

    #[test]
    fn from_raw_slots_accepts_every_field_at_once() {
        let claim = Claim::builder(SchemaHash::from_u128(SCHEMA))
            .with_id(fixture_id(), IdPosition::Value)
            .with_expiration_unix(1857686340)
            .with_flag_updatable(true)
            .with_merklized_root(U256::from_limbs([99, 0, 0, 0]), MerklizedRootPosition::Index)
            .with_version(7)
            .with_revocation_nonce(11)
            .with_value_data(Slot::from_field(FieldElement::from_u64(3)), Slot::ZERO)
            .build()
            .unwrap();
        assert_eq!(Claim::from_raw_slots(claim.to_raw_slots()).unwrap(), claim);
    }

    #[test]
    fn position_codes() {
        assert_eq!(IdPosition::None.code(), 0);
        assert_eq!(IdPosition::Index.code(), 1);
        assert_eq!(IdPosition::Value.code(), 2);
        assert_eq!(MerklizedRootPosition::Value.code(), 2);
    }

    #[test]
    fn claim_hash_is_hash_of_halves() {
        use zkid_crypto::Sha256FieldHasher as H;
        let claim = Claim::builder(SchemaHash::from_u128(SCHEMA))
            .with_revocation_nonce(1)
            .build()
            .unwrap();
        let (hi, hv) = claim.hi_hv::<H>().unwrap();
        assert_eq!(hi, H::hash(&claim.index_slots()).unwrap());
        assert_eq!(claim.hash::<H>().unwrap(), H::hash(&[hi, hv]).unwrap());
    }
}
