//! # Claim Vector Subcommands
//!
//! `zkid claims` builds random claims with the identity in the value
//! position, an expiration, the updatable flag, a random version and nonce,
//! and random 125-bit index and value data. `zkid claim-fixtures` emits a
//! fixed scenario per builder option so a consumer can pin each encoding
//! rule separately.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use zkid_claim::{Claim, ClaimError, ClaimVector, Id, IdPosition, MerklizedRootPosition, SchemaHash};
use zkid_core::{FieldElement, Slot};

use crate::config::GeneratorConfig;
use crate::emit_json;

/// The identity every generated claim is about.
pub const FIXTURE_ID: &str =
    "25425363284463910957419549722021124450832239517990785975889689633068548096";

/// The schema used by fixed fixtures.
pub const FIXTURE_SCHEMA: u128 = 75118319212313495155413841331241344325;

const FIXTURE_MERKLIZED_ROOT: &str =
    "93352129123234552352342342353456456452342343456345234121567843345";
const FIXTURE_EXPIRATION: u64 = 1857686340;
const FIXTURE_VERSION: u32 = 89220123;
const FIXTURE_NONCE: u64 = 3312445;
const FIXTURE_INDEX: [&str; 2] = [
    "16243864111864693853212588481963275789994876191154110553066821559749894481761",
    "7078462697308959301666117070269719819629678436794910510259518359026273676830",
];
const FIXTURE_VALUE: [&str; 2] = [
    "12448278679517811784508557734102986855579744384337338465055621486538311281772",
    "9260608685281348956030279125705000716237952776955782848598673606545494194823",
];

/// Random schema hashes and data are drawn below 2^125.
const RANDOM_BITS_MASK: u128 = (1 << 125) - 1;

/// Random expirations fall before 2269-12-31T00:00:00Z.
const EXPIRATION_UPPER_BOUND: u64 = 9_467_020_800;

/// Arguments for the `zkid claims` subcommand.
#[derive(Args, Debug)]
pub struct ClaimsArgs {
    /// Number of vectors to generate (overrides config).
    #[arg(long)]
    pub samples: Option<usize>,

    /// RNG seed for reproducible output (overrides config).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file, relative to the output directory.
    #[arg(long, short, default_value = "claimBuilderData.json")]
    pub out: PathBuf,
}

/// Execute the claims subcommand.
pub fn run_claims(args: &ClaimsArgs, config: &GeneratorConfig) -> Result<u8> {
    let samples = args.samples.unwrap_or(config.claim_samples);
    let seed = args
        .seed
        .or(config.seed)
        .unwrap_or_else(|| rand::thread_rng().gen());
    tracing::info!(samples, seed, "generating random claim vectors");

    let mut rng = StdRng::seed_from_u64(seed);
    let vectors = (0..samples)
        .map(|_| random_claim(&mut rng).map(|c| ClaimVector::from_claim(&c)))
        .collect::<Result<Vec<_>, _>>()
        .context("failed to build random claim")?;

    emit_json(&vectors, Some(&args.out), config)?;
    Ok(0)
}

/// One random claim in the generator's fixed shape.
pub fn random_claim<R: Rng + ?Sized>(rng: &mut R) -> Result<Claim, ClaimError> {
    let schema = SchemaHash::from_u128(rng.gen::<u128>() & RANDOM_BITS_MASK);
    let mut data = || Slot::from_field(FieldElement::from_u128(rng.gen::<u128>() & RANDOM_BITS_MASK));
    let (index_a, index_b, value_a, value_b) = (data(), data(), data(), data());

    Claim::builder(schema)
        .with_id(fixture_id()?, IdPosition::Value)
        .with_expiration_unix(rng.gen_range(0..EXPIRATION_UPPER_BOUND))
        .with_flag_updatable(true)
        .with_version(rng.gen())
        .with_revocation_nonce(rng.gen())
        .with_index_data(index_a, index_b)
        .with_value_data(value_a, value_b)
        .build()
}

/// Arguments for the `zkid claim-fixtures` subcommand.
#[derive(Args, Debug)]
pub struct ClaimFixturesArgs {
    /// Output file, relative to the output directory. Stdout if omitted.
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

/// A fixture vector with the scenario it exercises.
#[derive(Debug, Serialize)]
pub struct NamedVector {
    pub name: &'static str,
    #[serde(flatten)]
    pub vector: ClaimVector,
}

/// Execute the claim-fixtures subcommand.
pub fn run_claim_fixtures(args: &ClaimFixturesArgs, config: &GeneratorConfig) -> Result<u8> {
    let fixtures = claim_fixtures().context("failed to build claim fixtures")?;
    tracing::info!(count = fixtures.len(), "generated claim fixtures");
    let named: Vec<NamedVector> = fixtures
        .iter()
        .map(|(name, claim)| NamedVector { name: *name, vector: ClaimVector::from_claim(claim) })
        .collect();
    emit_json(&named, args.out.as_deref(), config)?;
    Ok(0)
}

/// Claims that each add one option to the previous, the disjoint identity
/// and merklized placements, and one claim using every option at once.
pub fn claim_fixtures() -> Result<Vec<(&'static str, Claim)>, ClaimError> {
    let schema = SchemaHash::from_u128(FIXTURE_SCHEMA);
    let id = fixture_id()?;
    let root = FieldElement::from_dec_str(FIXTURE_MERKLIZED_ROOT)?.as_uint();
    let slot = |s: &str| FieldElement::from_dec_str(s).map(Slot::from_field);
    let index = (slot(FIXTURE_INDEX[0])?, slot(FIXTURE_INDEX[1])?);
    let value = (slot(FIXTURE_VALUE[0])?, slot(FIXTURE_VALUE[1])?);

    let base = || Claim::builder(schema);
    let expiring = || {
        base()
            .with_id(id, IdPosition::Value)
            .with_expiration_unix(FIXTURE_EXPIRATION)
    };

    Ok(vec![
        ("schema", base().build()?),
        ("idIndex", base().with_id(id, IdPosition::Index).build()?),
        ("idValue", base().with_id(id, IdPosition::Value).build()?),
        ("expiration", expiring().build()?),
        ("updatable", expiring().with_flag_updatable(true).build()?),
        (
            "merklizedIndex",
            expiring()
                .with_flag_updatable(true)
                .with_merklized_root(root, MerklizedRootPosition::Index)
                .build()?,
        ),
        (
            "merklizedValue",
            base()
                .with_id(id, IdPosition::Index)
                .with_expiration_unix(FIXTURE_EXPIRATION)
                .with_flag_updatable(true)
                .with_merklized_root(root, MerklizedRootPosition::Value)
                .build()?,
        ),
        (
            "version",
            base()
                .with_id(id, IdPosition::Index)
                .with_expiration_unix(FIXTURE_EXPIRATION)
                .with_flag_updatable(true)
                .with_merklized_root(root, MerklizedRootPosition::Value)
                .with_version(FIXTURE_VERSION)
                .build()?,
        ),
        (
            "revocationNonce",
            base()
                .with_id(id, IdPosition::Index)
                .with_expiration_unix(FIXTURE_EXPIRATION)
                .with_flag_updatable(true)
                .with_merklized_root(root, MerklizedRootPosition::Value)
                .with_version(FIXTURE_VERSION)
                .with_revocation_nonce(FIXTURE_NONCE)
                .build()?,
        ),
        (
            "data",
            expiring()
                .with_flag_updatable(true)
                .with_version(FIXTURE_VERSION)
                .with_revocation_nonce(FIXTURE_NONCE)
                .with_index_data(index.0, index.1)
                .with_value_data(value.0, value.1)
                .build()?,
        ),
        (
            "combined",
            base()
                .with_id(id, IdPosition::Index)
                .with_expiration_unix(FIXTURE_EXPIRATION)
                .with_flag_updatable(true)
                .with_merklized_root(root, MerklizedRootPosition::Value)
                .with_version(FIXTURE_VERSION)
                .with_revocation_nonce(FIXTURE_NONCE)
                .with_index_data(index.0, index.1)
                .build()?,
        ),
    ])
}

fn fixture_id() -> Result<Id, ClaimError> {
    Id::from_int(FieldElement::from_dec_str(FIXTURE_ID)?)
}
