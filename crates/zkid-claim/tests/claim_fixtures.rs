//! Reference claim encodings.
//!
//! Each fixture builds a claim from the same schema, identity, date,
//! version, and nonce, adding one option at a time, and compares all eight
//! slots against known-good values.

use chrono::{TimeZone, Utc};

use zkid_claim::{Claim, ClaimError, ClaimVector, Id, IdPosition, MerklizedRootPosition, SchemaHash};
use zkid_core::{FieldElement, Slot, U256};

const SCHEMA: u128 = 75118319212313495155413841331241344325;
const ID: &str = "25425363284463910957419549722021124450832239517990785975889689633068548096";
const MERKLIZED_ROOT: &str = "93352129123234552352342342353456456452342343456345234121567843345";
const DATE: i64 = 1857686340;
const VERSION: u32 = 89220123;
const NONCE: u64 = 3312445;

const INDEX_X: &str =
    "16243864111864693853212588481963275789994876191154110553066821559749894481761";
const INDEX_Y: &str =
    "7078462697308959301666117070269719819629678436794910510259518359026273676830";
const VALUE_X: &str =
    "12448278679517811784508557734102986855579744384337338465055621486538311281772";
const VALUE_Y: &str =
    "9260608685281348956030279125705000716237952776955782848598673606545494194823";

const EXPIRATION_SLOT: &str = "34268264483206187164568125440";
const EXPIRATION_NONCE_SLOT: &str = "34268264483206187164571437885";

fn fe(s: &str) -> FieldElement {
    FieldElement::from_dec_str(s).unwrap()
}

fn slot(s: &str) -> Slot {
    Slot::from_field(fe(s))
}

fn schema() -> SchemaHash {
    SchemaHash::from_u128(SCHEMA)
}

fn id() -> Id {
    Id::from_int(fe(ID)).unwrap()
}

fn root() -> U256 {
    fe(MERKLIZED_ROOT).as_uint()
}

fn expected(pairs: &[(usize, &str)]) -> [FieldElement; 8] {
    let mut out = [FieldElement::ZERO; 8];
    for (i, v) in pairs {
        out[*i] = fe(v);
    }
    out
}

fn assert_slots(claim: &Claim, pairs: &[(usize, &str)]) {
    assert_eq!(claim.to_raw_slots(), expected(pairs));
    let decoded = Claim::from_raw_slots(claim.to_raw_slots()).unwrap();
    assert_eq!(&decoded, claim);
}

// ---------------------------------------------------------------------------
// One option at a time
// ---------------------------------------------------------------------------

#[test]
fn schema_only() {
    let claim = Claim::builder(schema()).build().unwrap();
    assert_slots(&claim, &[(0, "75118319212313495155413841331241344325")]);
}

#[test]
fn identity_in_index() {
    let claim = Claim::builder(schema())
        .with_id(id(), IdPosition::Index)
        .build()
        .unwrap();
    assert_slots(&claim, &[(0, "755683053054190422082163056194777767237"), (1, ID)]);
}

#[test]
fn identity_in_value() {
    let claim = Claim::builder(schema())
        .with_id(id(), IdPosition::Value)
        .build()
        .unwrap();
    assert_slots(&claim, &[(0, "1095965419975128885545537663626545978693"), (5, ID)]);
}

#[test]
fn expiration_date() {
    let claim = Claim::builder(schema())
        .with_id(id(), IdPosition::Value)
        .with_expiration_date(Utc.timestamp_opt(DATE, 0).unwrap())
        .build()
        .unwrap();
    assert_slots(
        &claim,
        &[
            (0, "3818224355342636593252534523080691670341"),
            (4, EXPIRATION_SLOT),
            (5, ID),
        ],
    );
    assert_eq!(claim.expiration_unix(), Some(DATE as u64));
}

#[test]
fn updatable_flag() {
    let claim = Claim::builder(schema())
        .with_id(id(), IdPosition::Value)
        .with_expiration_date(Utc.timestamp_opt(DATE, 0).unwrap())
        .with_flag_updatable(true)
        .build()
        .unwrap();
    assert_slots(
        &claim,
        &[
            (0, "9262742226077652008666528241988983053637"),
            (4, EXPIRATION_SLOT),
            (5, ID),
        ],
    );
}

#[test]
fn merklized_root_in_index() {
    let claim = Claim::builder(schema())
        .with_id(id(), IdPosition::Value)
        .with_expiration_date(Utc.timestamp_opt(DATE, 0).unwrap())
        .with_flag_updatable(true)
        .with_merklized_root(root(), MerklizedRootPosition::Index)
        .build()
        .unwrap();
    assert_slots(
        &claim,
        &[
            (0, "20151777967547682839494515679805565820229"),
            (2, MERKLIZED_ROOT),
            (4, EXPIRATION_SLOT),
            (5, ID),
        ],
    );
    assert_eq!(claim.merklized_root(), Some(fe(MERKLIZED_ROOT)));
}

#[test]
fn version() {
    let claim = Claim::builder(schema())
        .with_id(id(), IdPosition::Index)
        .with_expiration_date(Utc.timestamp_opt(DATE, 0).unwrap())
        .with_flag_updatable(true)
        .with_merklized_root(root(), MerklizedRootPosition::Value)
        .with_version(VERSION)
        .build()
        .unwrap();
    assert_slots(
        &claim,
        &[
            (0, "130395355847364580763723041924956401975642229354401881413"),
            (1, ID),
            (4, EXPIRATION_SLOT),
            (6, MERKLIZED_ROOT),
        ],
    );
    assert_eq!(claim.version(), VERSION);
}

#[test]
fn revocation_nonce() {
    let claim = Claim::builder(schema())
        .with_id(id(), IdPosition::Index)
        .with_expiration_date(Utc.timestamp_opt(DATE, 0).unwrap())
        .with_flag_updatable(true)
        .with_merklized_root(root(), MerklizedRootPosition::Value)
        .with_version(VERSION)
        .with_revocation_nonce(NONCE)
        .build()
        .unwrap();
    assert_slots(
        &claim,
        &[
            (0, "130395355847364580763723041924956401975642229354401881413"),
            (1, ID),
            (4, EXPIRATION_NONCE_SLOT),
            (6, MERKLIZED_ROOT),
        ],
    );
    assert_eq!(claim.revocation_nonce(), NONCE);
}

#[test]
fn index_and_value_data() {
    let claim = Claim::builder(schema())
        .with_id(id(), IdPosition::Value)
        .with_expiration_date(Utc.timestamp_opt(DATE, 0).unwrap())
        .with_flag_updatable(true)
        .with_version(VERSION)
        .with_revocation_nonce(NONCE)
        .with_index_data(slot(INDEX_X), slot(INDEX_Y))
        .with_value_data(slot(VALUE_X), slot(VALUE_Y))
        .build()
        .unwrap();
    assert_slots(
        &claim,
        &[
            (0, "130395355847364559325933925905833203783041961153004559685"),
            (2, INDEX_X),
            (3, INDEX_Y),
            (4, EXPIRATION_NONCE_SLOT),
            (5, ID),
            (6, VALUE_X),
            (7, VALUE_Y),
        ],
    );
    assert_eq!(claim.index_data(), (slot(INDEX_X), slot(INDEX_Y)));
    assert_eq!(claim.value_data(), (slot(VALUE_X), slot(VALUE_Y)));
}

// ---------------------------------------------------------------------------
// Slot conflicts
// ---------------------------------------------------------------------------

#[test]
fn identity_and_root_in_value_is_rejected() {
    let err = Claim::builder(schema())
        .with_id(id(), IdPosition::Value)
        .with_merklized_root(root(), MerklizedRootPosition::Value)
        .build()
        .unwrap_err();
    assert!(matches!(err, ClaimError::SlotConflict { .. }));
}

#[test]
fn identity_in_index_and_root_in_value_is_accepted() {
    let claim = Claim::builder(schema())
        .with_id(id(), IdPosition::Index)
        .with_merklized_root(root(), MerklizedRootPosition::Value)
        .build()
        .unwrap();
    assert_eq!(claim.id(), Some(id()));
    assert_eq!(claim.merklized_root(), Some(fe(MERKLIZED_ROOT)));
}

// ---------------------------------------------------------------------------
// Contract vectors
// ---------------------------------------------------------------------------

#[test]
fn contract_vector_for_full_claim() {
    let claim = Claim::builder(schema())
        .with_id(id(), IdPosition::Index)
        .with_expiration_unix(DATE as u64)
        .with_flag_updatable(true)
        .with_merklized_root(root(), MerklizedRootPosition::Value)
        .with_version(VERSION)
        .with_revocation_nonce(NONCE)
        .build()
        .unwrap();
    let vector = ClaimVector::from_claim(&claim);
    assert_eq!(
        vector.contract_input,
        [
            SCHEMA.to_string(),
            "1".into(),
            "true".into(),
            "true".into(),
            "2".into(),
            VERSION.to_string(),
            ID.into(),
            NONCE.to_string(),
            DATE.to_string(),
            MERKLIZED_ROOT.into(),
            "0".into(),
            "0".into(),
            MERKLIZED_ROOT.into(),
            "0".into(),
        ]
    );
    assert_eq!(vector.expected_claims, claim.to_raw_slots());
}
