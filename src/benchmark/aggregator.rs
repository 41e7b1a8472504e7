//! Trial aggregation
//!
//! Runs one (target, level) pair a fixed number of times and reduces the
//! extracted timings to a mean.

use thiserror::Error;
use tracing::{debug, info, warn};

use super::extractor::{ExtractError, ResultExtractor};
use crate::executor::{ProcessRunner, RunError};
use crate::models::{BenchmarkResult, BenchmarkTarget, InvocationSpec};
use crate::utils::format_duration;

/// A trial that produced no usable measurement
#[derive(Error, Debug)]
pub enum TrialError {
    #[error(transparent)]
    Run(#[from] RunError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Outcome of one trial: a timing in seconds, or why there is none
pub type TrialOutcome = Result<f64, TrialError>;

/// Repeats a target invocation and averages the successful timings
#[derive(Clone, Debug)]
pub struct TrialAggregator {
    runner: ProcessRunner,
    extractor: ResultExtractor,
    repeats: u32,
}

impl TrialAggregator {
    pub fn new(runner: ProcessRunner, extractor: ResultExtractor, repeats: u32) -> Self {
        Self {
            runner,
            extractor,
            repeats,
        }
    }

    pub fn repeats(&self) -> u32 {
        self.repeats
    }

    /// Run a single trial
    pub async fn run_trial(&self, target: &BenchmarkTarget, spec: &InvocationSpec) -> TrialOutcome {
        let output = self.runner.run(target.path(), spec).await?;
        debug!(
            "{} exited after {}",
            target.name(),
            format_duration(output.elapsed)
        );
        if !output.stderr.trim().is_empty() {
            debug!("{} stderr: {}", target.name(), output.stderr.trim());
        }
        Ok(self.extractor.extract(&output.stdout)?)
    }

    /// Run all trials in sequence. Failed trials are reported and skipped.
    pub async fn aggregate(
        &self,
        target: &BenchmarkTarget,
        spec: &InvocationSpec,
    ) -> BenchmarkResult {
        let label = match spec.label() {
            Some(label) => format!("{} ({label})", target.name()),
            None => target.name().to_string(),
        };

        let mut samples = Vec::with_capacity(self.repeats as usize);

        for trial in 1..=self.repeats {
            info!("[{}/{}] {}", trial, self.repeats, label);

            match self.run_trial(target, spec).await {
                Ok(value) => {
                    debug!("{} trial {}: {}s", label, trial, value);
                    samples.push(value);
                }
                Err(TrialError::Extract(e)) => {
                    warn!("{} trial {}: no timing in output: {}", label, trial, e);
                }
                Err(TrialError::Run(e)) => {
                    warn!("{} trial {}: {}", label, trial, e);
                }
            }
        }

        let result = BenchmarkResult::new(target, spec, samples, self.repeats);

        if result.has_data() {
            info!(
                "{}: {}/{} trials succeeded ({} failed)",
                label,
                result.succeeded(),
                result.attempted,
                result.failed()
            );
        } else {
            warn!("{}: no successful trials out of {}", label, self.repeats);
        }

        result
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::models::BaseEnvironment;
    use crate::utils::fixture::write_script;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn script(dir: &Path, name: &str, body: &str) -> BenchmarkTarget {
        BenchmarkTarget::new(write_script(dir, name, body), "omp")
    }

    fn aggregator(repeats: u32) -> TrialAggregator {
        TrialAggregator::new(
            ProcessRunner::new(BaseEnvironment::capture_without("OMP_NUM_THREADS")),
            ResultExtractor::new("Total time:").unwrap(),
            repeats,
        )
    }

    fn serial() -> InvocationSpec {
        InvocationSpec::serial(Arc::from(Vec::new()))
    }

    fn count_lines(path: &Path) -> usize {
        std::fs::read_to_string(path).unwrap().lines().count()
    }

    #[tokio::test]
    async fn test_issues_exactly_r_invocations_when_all_fail() {
        let dir = tempdir().unwrap();
        let counter = dir.path().join("count");
        let target = script(
            dir.path(),
            "always_fails",
            &format!("echo run >> {}\nexit 1", counter.display()),
        );

        let result = aggregator(4).aggregate(&target, &serial()).await;

        assert_eq!(count_lines(&counter), 4);
        assert_eq!(result.attempted, 4);
        assert_eq!(result.mean_secs, None);
        assert!(!result.has_data());
    }

    #[tokio::test]
    async fn test_mean_of_successful_trials_only() {
        let dir = tempdir().unwrap();
        let counter = dir.path().join("count");
        // Trials 1 and 3 print a timing; trial 2 exits non-zero, trial 4
        // prints no marker.
        let body = format!(
            r#"echo run >> {c}
n=$(wc -l < {c} | tr -d ' ')
case "$n" in
  1) echo "Total time: 1.0" ;;
  2) exit 2 ;;
  3) echo "Total time: 3.0" ;;
  *) echo "done" ;;
esac"#,
            c = counter.display()
        );
        let target = script(dir.path(), "flaky", &body);

        let result = aggregator(4).aggregate(&target, &serial()).await;

        assert_eq!(count_lines(&counter), 4);
        assert_eq!(result.samples, vec![1.0, 3.0]);
        assert_eq!(result.mean_secs, Some(2.0));
        assert_eq!(result.failed(), 2);
    }

    #[tokio::test]
    async fn test_missing_marker_is_extract_error() {
        let dir = tempdir().unwrap();
        let target = script(dir.path(), "quiet", "echo hello");

        let outcome = aggregator(1).run_trial(&target, &serial()).await;
        assert!(matches!(outcome, Err(TrialError::Extract(_))));
    }

    #[tokio::test]
    async fn test_zero_timing_is_data() {
        let dir = tempdir().unwrap();
        let target = script(dir.path(), "instant", r#"echo "Total time: 0.0""#);

        let result = aggregator(2).aggregate(&target, &serial()).await;
        assert_eq!(result.mean_secs, Some(0.0));
        assert!(result.has_data());
    }
}
