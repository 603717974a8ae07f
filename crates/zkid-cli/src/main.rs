//! # zkid CLI entry point
//!
//! Parses command-line arguments, resolves configuration, and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use zkid_cli::claims::{run_claim_fixtures, run_claims, ClaimFixturesArgs, ClaimsArgs};
use zkid_cli::config::GeneratorConfig;
use zkid_cli::smt::{run_smt_proof, SmtProofArgs};

/// zkid test-vector generator.
///
/// Emits claim encodings and fixed-depth sparse Merkle tree proofs as
/// decimal-string JSON for contract and circuit test suites.
#[derive(Parser, Debug)]
#[command(name = "zkid", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output directory for generated files.
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Random claim builder vectors.
    Claims(ClaimsArgs),

    /// One claim vector per builder option, from fixed inputs.
    ClaimFixtures(ClaimFixturesArgs),

    /// Fixed-depth proof for a key in a Poseidon sparse Merkle tree.
    SmtProof(SmtProofArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match GeneratorConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::from(1);
        }
    };
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }
    tracing::debug!(?config, "resolved configuration");

    let result = match cli.command {
        Commands::Claims(args) => run_claims(&args, &config),
        Commands::ClaimFixtures(args) => run_claim_fixtures(&args, &config),
        Commands::SmtProof(args) => run_smt_proof(&args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
