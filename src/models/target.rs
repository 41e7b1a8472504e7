//! Benchmark target models
//!
//! Defines the executables under test and how they are classified.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// How a target is driven by the sweep controller
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Runs once per benchmark, no environment override
    Serial,
    /// Runs once per configured level with the thread variable set
    Parallel,
}

impl TargetKind {
    /// Classify a file name against the parallel-variant marker
    pub fn classify(file_name: &str, parallel_marker: &str) -> Self {
        if file_name.contains(parallel_marker) {
            TargetKind::Parallel
        } else {
            TargetKind::Serial
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TargetKind::Serial => "serial",
            TargetKind::Parallel => "parallel",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One executable under benchmark
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BenchmarkTarget {
    path: PathBuf,
    name: String,
    kind: TargetKind,
}

impl BenchmarkTarget {
    /// Create a target, deriving its kind from the file name
    pub fn new(path: impl Into<PathBuf>, parallel_marker: &str) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        let kind = TargetKind::classify(&name, parallel_marker);

        Self { path, name, kind }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name of the executable
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }
}

impl fmt::Display for BenchmarkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.kind)
    }
}
