//! Benchmark result models
//!
//! One row of the final report per (target, level) pair.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::{BenchmarkTarget, InvocationSpec, TargetKind};

/// Arithmetic mean of the samples, or `None` when there are none
pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Aggregated outcome for one (target, level) pair
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Executable file name
    pub target: String,
    pub path: PathBuf,
    pub kind: TargetKind,
    /// Environment variable swept for this row, if any
    pub thread_var: Option<String>,
    pub level: Option<u32>,
    /// Mean of the successful samples; `None` means no data
    pub mean_secs: Option<f64>,
    /// Successfully extracted timings, in trial order
    pub samples: Vec<f64>,
    /// Trials launched, successful or not
    pub attempted: u32,
}

impl BenchmarkResult {
    pub fn new(
        target: &BenchmarkTarget,
        spec: &InvocationSpec,
        samples: Vec<f64>,
        attempted: u32,
    ) -> Self {
        Self {
            target: target.name().to_string(),
            path: target.path().to_path_buf(),
            kind: target.kind(),
            thread_var: spec.env_override.as_ref().map(|ov| ov.name.clone()),
            level: spec.level,
            mean_secs: mean(&samples),
            samples,
            attempted,
        }
    }

    pub fn succeeded(&self) -> u32 {
        self.samples.len() as u32
    }

    pub fn failed(&self) -> u32 {
        self.attempted.saturating_sub(self.succeeded())
    }

    pub fn has_data(&self) -> bool {
        self.mean_secs.is_some()
    }

    /// `VAR=level` label for swept rows
    pub fn level_label(&self) -> Option<String> {
        match (&self.thread_var, self.level) {
            (Some(var), Some(level)) => Some(format!("{var}={level}")),
            (None, Some(level)) => Some(level.to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.target)?;
        if let Some(label) = self.level_label() {
            write!(f, " ({label})")?;
        }
        match self.mean_secs {
            Some(mean) => write!(f, ": {mean:.6}s"),
            None => write!(f, ": no data"),
        }
    }
}
