//! # Contract Test Vectors
//!
//! A `ClaimVector` pairs the fourteen decimal inputs a contract-side claim
//! builder receives with the eight slot values it must produce. Vectors are
//! consumed by external test suites, so the JSON shape is fixed:
//!
//! ```json
//! { "contractInput": ["<schema>", "<idPos>", ...], "expectedClaims": ["<slot0>", ...] }
//! ```
//!
//! Booleans are rendered as `"true"` / `"false"`; absent optional values as
//! `"0"`.

use serde::{Deserialize, Serialize};

use zkid_core::{serde_array, FieldElement};

use crate::claim::{Claim, SLOT_COUNT};

/// Number of contract inputs.
pub const CONTRACT_INPUT_LEN: usize = 14;

/// One contract-facing claim fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimVector {
    /// Builder inputs in contract order.
    #[serde(with = "serde_array")]
    pub contract_input: [String; CONTRACT_INPUT_LEN],
    /// The expected slot values.
    #[serde(with = "serde_array")]
    pub expected_claims: [FieldElement; SLOT_COUNT],
}

impl ClaimVector {
    /// Derive the contract inputs and expected slots from a built claim.
    ///
    /// Input order: schema hash, identity position code, expirable,
    /// updatable, merklized position code, version, identity, revocation
    /// nonce, expiration, merklized root, index data A and B, value data A
    /// and B. Data inputs are the raw slot values, so a merklized root also
    /// appears as data on its side.
    pub fn from_claim(claim: &Claim) -> Self {
        let raw = claim.to_raw_slots();
        let zero = || "0".to_string();

        let contract_input = [
            claim.schema_hash().to_string(),
            claim.id_position().code().to_string(),
            claim.flag_expirable().to_string(),
            claim.flag_updatable().to_string(),
            claim.merklized_position().code().to_string(),
            claim.version().to_string(),
            claim.id().map_or_else(zero, |id| id.to_string()),
            claim.revocation_nonce().to_string(),
            claim.expiration_unix().map_or_else(zero, |t| t.to_string()),
            claim.merklized_root().map_or_else(zero, |r| r.to_string()),
            raw[2].to_string(),
            raw[3].to_string(),
            raw[6].to_string(),
            raw[7].to_string(),
        ];

        Self {
            contract_input,
            expected_claims: raw,
        }
    }
}
