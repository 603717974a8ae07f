//! # Tree Proof Subcommand
//!
//! Builds a Poseidon sparse Merkle tree from the given leaves and emits a
//! fixed-depth proof for one key, either in circuit form or as circom
//! `SMTVerifier` inputs.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Args;

use zkid_core::FieldElement;
use zkid_crypto::{MemoryTree, PoseidonHasher};
use zkid_zkp::{serialize_proof_dyn, SerializedCircomProof};

use crate::config::GeneratorConfig;
use crate::emit_json;

/// A leaf given on the command line as `INDEX:VALUE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leaf {
    pub index: FieldElement,
    pub value: FieldElement,
}

impl FromStr for Leaf {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (index, value) = s
            .split_once(':')
            .ok_or_else(|| format!("expected INDEX:VALUE, got {s:?}"))?;
        let parse = |part: &str| FieldElement::from_dec_str(part.trim()).map_err(|e| e.to_string());
        Ok(Self {
            index: parse(index)?,
            value: parse(value)?,
        })
    }
}

/// Arguments for the `zkid smt-proof` subcommand.
#[derive(Args, Debug)]
pub struct SmtProofArgs {
    /// Leaf to insert, in decimal. Repeatable. Defaults to 2^62-1:100 and
    /// 2^63-1:100.
    #[arg(long = "leaf", value_name = "INDEX:VALUE")]
    pub leaves: Vec<Leaf>,

    /// Key to prove. Defaults to 2^63-1.
    #[arg(long)]
    pub key: Option<FieldElement>,

    /// Tree and circuit depth (overrides config).
    #[arg(long)]
    pub depth: Option<usize>,

    /// Emit circom SMTVerifier inputs instead of the circuit proof.
    #[arg(long)]
    pub circom: bool,

    /// Output file, relative to the output directory. Stdout if omitted.
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

/// 2^62-1 and 2^63-1: two keys whose leaves sit at depth 63.
pub fn default_leaves() -> Vec<Leaf> {
    let value = FieldElement::from_u64(100);
    vec![
        Leaf { index: FieldElement::from_u64(u64::MAX >> 2), value },
        Leaf { index: FieldElement::from_u64(u64::MAX >> 1), value },
    ]
}

/// Execute the smt-proof subcommand.
pub fn run_smt_proof(args: &SmtProofArgs, config: &GeneratorConfig) -> Result<u8> {
    let depth = args.depth.unwrap_or(config.tree_depth);
    let leaves = if args.leaves.is_empty() {
        default_leaves()
    } else {
        args.leaves.clone()
    };
    let key = args.key.unwrap_or(FieldElement::from_u64(u64::MAX >> 1));

    let mut tree = MemoryTree::<PoseidonHasher>::new(depth).context("invalid tree depth")?;
    for leaf in &leaves {
        tree.add(leaf.index, leaf.value)
            .with_context(|| format!("failed to insert leaf {}", leaf.index))?;
        tracing::debug!(index = %leaf.index, value = %leaf.value, "inserted leaf");
    }

    let (proof, value) = tree
        .generate_proof(key)
        .with_context(|| format!("failed to prove key {key}"))?;
    tracing::info!(
        root = %tree.root(),
        existence = proof.existence,
        path_depth = proof.depth(),
        "generated proof"
    );

    let serialized = serialize_proof_dyn(&proof, tree.root(), key, value, depth)?;
    if args.circom {
        emit_json(&SerializedCircomProof::from(&serialized), args.out.as_deref(), config)?;
    } else {
        emit_json(&serialized, args.out.as_deref(), config)?;
    }
    Ok(0)
}
