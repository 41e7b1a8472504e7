//! Benchmark report model
//!
//! Everything one harness run produced, in discovery order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::HarnessConfig;
use crate::models::BenchmarkResult;

/// Results of one harness run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Effective configuration the run used
    pub config: HarnessConfig,
    pub results: Vec<BenchmarkResult>,
}

impl BenchmarkReport {
    /// Start an empty report now
    pub fn start(config: HarnessConfig) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            config,
            results: Vec::new(),
        }
    }

    pub fn extend(&mut self, results: impl IntoIterator<Item = BenchmarkResult>) {
        self.results.extend(results);
    }

    pub fn finish(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }

    /// Rows that ended without any successful trial
    pub fn no_data_count(&self) -> usize {
        self.results.iter().filter(|r| !r.has_data()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
