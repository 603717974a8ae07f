//! # Generator Configuration
//!
//! Settings shared by every subcommand. Resolved in increasing precedence:
//! built-in defaults, the `--config` YAML file, environment variables, and
//! finally explicit command-line flags (applied by the caller).
//!
//! Environment variables:
//! - `ZKID_OUTPUT_DIR` (default: `.`)
//! - `ZKID_CLAIM_SAMPLES` (default: 25)
//! - `ZKID_TREE_DEPTH` (default: 64)

use std::path::{Path, PathBuf};

use serde::Deserialize;

use zkid_crypto::smt::MAX_DEPTH_HARD_CAP;

/// Default number of random claim vectors.
pub const DEFAULT_CLAIM_SAMPLES: usize = 25;

/// Default tree and circuit depth.
pub const DEFAULT_TREE_DEPTH: usize = 64;

/// Vector generator settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Directory relative output files are written under.
    pub output_dir: PathBuf,
    /// Random claim vectors per `claims` run.
    pub claim_samples: usize,
    /// Tree and circuit depth for `smt-proof`.
    pub tree_depth: usize,
    /// RNG seed; random when absent.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            claim_samples: DEFAULT_CLAIM_SAMPLES,
            tree_depth: DEFAULT_TREE_DEPTH,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Defaults, then `file` if given, then the environment.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match file {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        base.with_env(|var| std::env::var(var).ok())
    }

    /// Parse a YAML file. Missing keys keep their defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e.to_string()))?;
        let config: Self = serde_yaml::from_str(&raw)
            .map_err(|e| ConfigError::Parse(path.display().to_string(), e.to_string()))?;
        config.validate()
    }

    /// Overlay variables read through `lookup`.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("ZKID_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup("ZKID_CLAIM_SAMPLES") {
            self.claim_samples = parse_var("ZKID_CLAIM_SAMPLES", &raw)?;
        }
        if let Some(raw) = lookup("ZKID_TREE_DEPTH") {
            self.tree_depth = parse_var("ZKID_TREE_DEPTH", &raw)?;
        }
        self.validate()
    }

    /// Resolve `path` against `output_dir` unless it is absolute.
    pub fn output_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.output_dir.join(path)
        }
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.tree_depth == 0 || self.tree_depth > MAX_DEPTH_HARD_CAP {
            return Err(ConfigError::InvalidValue(
                "tree_depth".to_string(),
                self.tree_depth.to_string(),
            ));
        }
        Ok(self)
    }
}

fn parse_var(var: &str, raw: &str) -> Result<usize, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(var.to_string(), raw.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read (path, reason).
    #[error("failed to read config {0}: {1}")]
    Io(String, String),

    /// The config file is not valid YAML for `GeneratorConfig` (path, reason).
    #[error("failed to parse config {0}: {1}")]
    Parse(String, String),

    /// An environment variable or field holds an unusable value (name, value).
    #[error("invalid value for {0}: {1:?}")]
    InvalidValue(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults() {
        let c = GeneratorConfig::default().with_env(env(&[])).unwrap();
        assert_eq!(c.output_dir, PathBuf::from("."));
        assert_eq!(c.claim_samples, 25);
        assert_eq!(c.tree_depth, 64);
        assert_eq!(c.seed, None);
    }

    #[test]
    fn env_overrides_defaults() {
        let c = GeneratorConfig::default()
            .with_env(env(&[
                ("ZKID_OUTPUT_DIR", "/tmp/vectors"),
                ("ZKID_CLAIM_SAMPLES", "3"),
                ("ZKID_TREE_DEPTH", " 32 "),
            ]))
            .unwrap();
        assert_eq!(c.output_dir, PathBuf::from("/tmp/vectors"));
        assert_eq!(c.claim_samples, 3);
        assert_eq!(c.tree_depth, 32);
    }

    #[test]
    fn bad_env_value_is_reported() {
        let err = GeneratorConfig::default()
            .with_env(env(&[("ZKID_CLAIM_SAMPLES", "many")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(var, _) if var == "ZKID_CLAIM_SAMPLES"));
    }

    #[test]
    fn depth_above_cap_is_rejected() {
        let err = GeneratorConfig::default()
            .with_env(env(&[("ZKID_TREE_DEPTH", "257")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(..)));
    }

    #[test]
    fn yaml_file_with_partial_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zkid.yaml");
        std::fs::write(&path, "claim_samples: 7\nseed: 42\n").unwrap();
        let c = GeneratorConfig::from_yaml_file(&path).unwrap();
        assert_eq!(c.claim_samples, 7);
        assert_eq!(c.seed, Some(42));
        assert_eq!(c.tree_depth, DEFAULT_TREE_DEPTH);
    }

    #[test]
    fn yaml_unknown_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zkid.yaml");
        std::fs::write(&path, "samples: 7\n").unwrap();
        assert!(matches!(
            GeneratorConfig::from_yaml_file(&path),
            Err(ConfigError::Parse(..))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = GeneratorConfig::from_yaml_file(Path::new("/nonexistent/zkid.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
    }

    #[test]
    fn output_path_keeps_absolute() {
        let c = GeneratorConfig { output_dir: PathBuf::from("out"), ..Default::default() };
        assert_eq!(c.output_path(Path::new("a.json")), PathBuf::from("out/a.json"));
        assert_eq!(c.output_path(Path::new("/abs/a.json")), PathBuf::from("/abs/a.json"));
    }
}
