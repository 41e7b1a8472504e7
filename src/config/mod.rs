//! Configuration module
//!
//! Handles loading and managing harness configuration.

mod env;
mod file;

pub use env::{print_env_help, EnvConfig};
pub use file::{find_config_file, is_yaml_file};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Harness configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Directory scanned for benchmark executables
    pub executables_dir: PathBuf,

    /// Substitution matrix passed to every target
    pub substitution_matrix: PathBuf,

    /// Sequence files passed to every target, in order
    pub sequence_files: Vec<PathBuf>,

    /// Thread counts swept for parallel targets, in order
    pub levels: Vec<u32>,

    /// Trials per (target, level) pair
    pub repeats: u32,

    /// Environment variable carrying the level
    pub thread_var: String,

    /// File-name substring identifying parallel targets
    pub parallel_marker: String,

    /// Label printed by targets before the elapsed seconds
    pub time_marker: String,

    /// Per-trial wall-clock bound; unbounded when absent
    pub timeout_secs: Option<u64>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            executables_dir: PathBuf::from("../executables"),
            substitution_matrix: PathBuf::from("../scoring/PAM250.txt"),
            sequence_files: vec![
                PathBuf::from("../database/query.fasta"),
                PathBuf::from("../database/database.fasta"),
            ],
            levels: vec![1, 2, 4, 8, 16, 32, 64],
            repeats: 6,
            thread_var: "OMP_NUM_THREADS".to_string(),
            parallel_marker: "omp".to_string(),
            time_marker: "Total time:".to_string(),
            timeout_secs: None,
        }
    }
}

impl HarnessConfig {
    /// Load configuration from a YAML or JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_yaml_file(path) {
            serde_yaml::to_string(self).context("Failed to serialize config")?
        } else {
            serde_json::to_string_pretty(self).context("Failed to serialize config")?
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Resolve the file-level configuration.
    ///
    /// Uses `explicit`, then the `ALIGN_BENCH_CONFIG` path, then the
    /// standard locations; defaults when none exists. Environment
    /// overrides are applied on top.
    pub fn resolve(explicit: Option<&Path>, env: &EnvConfig) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env.config_file.clone())
            .or_else(find_config_file);

        let mut config = match path {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                Self::load(&path)?
            }
            None => Self::default(),
        };

        env.apply(&mut config);
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.repeats == 0 {
            anyhow::bail!("repeats must be at least 1");
        }
        if self.levels.is_empty() {
            anyhow::bail!("levels must not be empty");
        }
        if self.levels.contains(&0) {
            anyhow::bail!("levels must be positive: {:?}", self.levels);
        }
        if self.sequence_files.is_empty() {
            anyhow::bail!("at least one sequence file is required");
        }
        if self.thread_var.is_empty() || self.thread_var.contains('=') {
            anyhow::bail!("invalid thread variable name: '{}'", self.thread_var);
        }
        if self.parallel_marker.is_empty() {
            anyhow::bail!("parallel marker must not be empty");
        }
        if self.time_marker.is_empty() {
            anyhow::bail!("time marker must not be empty");
        }
        if self.timeout_secs == Some(0) {
            anyhow::bail!("timeout must be at least 1 second");
        }
        Ok(())
    }

    /// Fixed argument vector passed to every target
    pub fn command_args(&self) -> Vec<String> {
        let mut args = vec![
            "--substitution_matrix".to_string(),
            self.substitution_matrix.to_string_lossy().into_owned(),
            "--files".to_string(),
        ];
        args.extend(
            self.sequence_files
                .iter()
                .map(|f| f.to_string_lossy().into_owned()),
        );
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = HarnessConfig::default();
        assert_eq!(config.repeats, 6);
        assert_eq!(config.levels, vec![1, 2, 4, 8, 16, 32, 64]);
        assert_eq!(config.thread_var, "OMP_NUM_THREADS");
        assert_eq!(config.timeout_secs, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_command_args() {
        let args = HarnessConfig::default().command_args();
        assert_eq!(
            args,
            vec![
                "--substitution_matrix",
                "../scoring/PAM250.txt",
                "--files",
                "../database/query.fasta",
                "../database/database.fasta",
            ]
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = [
            HarnessConfig {
                repeats: 0,
                ..Default::default()
            },
            HarnessConfig {
                levels: Vec::new(),
                ..Default::default()
            },
            HarnessConfig {
                levels: vec![1, 0],
                ..Default::default()
            },
            HarnessConfig {
                sequence_files: Vec::new(),
                ..Default::default()
            },
            HarnessConfig {
                thread_var: "A=B".to_string(),
                ..Default::default()
            },
            HarnessConfig {
                time_marker: String::new(),
                ..Default::default()
            },
            HarnessConfig {
                timeout_secs: Some(0),
                ..Default::default()
            },
        ];

        for config in bad {
            assert!(config.validate().is_err(), "accepted {config:?}");
        }
    }

    #[test]
    fn test_save_load_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/align-bench.yaml");

        let config = HarnessConfig {
            repeats: 3,
            levels: vec![2, 4],
            timeout_secs: Some(600),
            ..Default::default()
        };
        config.save(&path).unwrap();

        assert_eq!(HarnessConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"repeats": 2, "parallel_marker": "par"}"#).unwrap();

        let config = HarnessConfig::load(&path).unwrap();
        assert_eq!(config.repeats, 2);
        assert_eq!(config.parallel_marker, "par");
        assert_eq!(config.thread_var, "OMP_NUM_THREADS");
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "repeats: 0\n").unwrap();

        assert!(HarnessConfig::load(&path).is_err());
    }

    #[test]
    fn test_resolve_explicit_path_then_env() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "repeats: 9\nlevels: [1, 2]\n").unwrap();

        let env = EnvConfig {
            levels: Some(vec![4]),
            ..Default::default()
        };
        let config = HarnessConfig::resolve(Some(&path), &env).unwrap();

        assert_eq!(config.repeats, 9);
        assert_eq!(config.levels, vec![4]);
    }
}
