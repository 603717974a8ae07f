//! # zkid-cli — Vector Generator
//!
//! Provides the `zkid` command-line interface, which writes the JSON
//! fixtures consumed by contract and circuit test suites.
//!
//! ## Subcommands
//!
//! - `zkid claims`: random claim builder vectors.
//! - `zkid claim-fixtures`: one vector per claim option, fixed inputs.
//! - `zkid smt-proof`: a fixed-depth tree proof for given leaves.
//!
//! ```bash
//! zkid claims --samples 25 --seed 7
//! zkid --output-dir data claim-fixtures --out claimFixtures.json
//! zkid smt-proof --leaf 4:444 --leaf 2:222 --key 6 --depth 64
//! ```
//!
//! All field-sized numbers are emitted as decimal strings.

pub mod claims;
pub mod config;
pub mod smt;

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::GeneratorConfig;

/// Write `value` as pretty JSON to `out` (under the output directory), or
/// to stdout when `out` is `None`.
pub fn emit_json<T: Serialize>(
    value: &T,
    out: Option<&Path>,
    config: &GeneratorConfig,
) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    let Some(out) = out else {
        println!("{json}");
        return Ok(());
    };

    let path = config.output_path(out);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(&path, json + "\n")
        .with_context(|| format!("failed to write output: {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote output");
    Ok(())
}
