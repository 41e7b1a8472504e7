//! Harness driver
//!
//! Discovers targets and sweeps each of them, strictly one at a time.

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use super::aggregator::TrialAggregator;
use super::extractor::ResultExtractor;
use super::report::BenchmarkReport;
use super::sweep::SweepController;
use crate::config::HarnessConfig;
use crate::discovery;
use crate::executor::ProcessRunner;
use crate::models::{BaseEnvironment, BenchmarkTarget};
use crate::utils::{format_duration, Timer};

/// Runs the whole benchmark for one configuration
pub struct Harness {
    config: HarnessConfig,
    sweep: SweepController,
}

impl Harness {
    /// Build a harness, snapshotting the environment once
    pub fn new(config: HarnessConfig) -> Result<Self> {
        config.validate().context("Invalid harness configuration")?;

        let base_env = BaseEnvironment::capture_without(&config.thread_var);
        debug!(
            "Captured {} environment variables ({} excluded)",
            base_env.len(),
            config.thread_var
        );
        let runner = ProcessRunner::new(base_env).with_timeout(config.timeout_secs);
        let extractor = ResultExtractor::new(config.time_marker.clone())?;
        let aggregator = TrialAggregator::new(runner, extractor, config.repeats);
        let sweep = SweepController::new(
            aggregator,
            config.command_args(),
            config.thread_var.clone(),
            config.levels.clone(),
        );

        Ok(Self { config, sweep })
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn sweep(&self) -> &SweepController {
        &self.sweep
    }

    /// Discover targets without running them
    pub fn discover(&self) -> Result<Vec<BenchmarkTarget>> {
        discovery::discover(&self.config.executables_dir, &self.config.parallel_marker)
    }

    /// Discover and benchmark every target.
    ///
    /// Only an unreadable executables directory is fatal.
    pub async fn run(&self) -> Result<BenchmarkReport> {
        let targets = self.discover()?;
        let timer = Timer::start("benchmark run");
        let mut report = BenchmarkReport::start(self.config.clone());

        for target in &targets {
            report.extend(self.sweep.run(target).await);
        }

        let report = report.finish();
        if report.is_empty() {
            warn!(
                "No executables found in {}",
                self.config.executables_dir.display()
            );
        }
        info!(
            "Benchmarked {} target(s), {} result(s) ({} without data) in {}",
            targets.len(),
            report.results.len(),
            report.no_data_count(),
            format_duration(timer.stop())
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_config() {
        let config = HarnessConfig {
            repeats: 0,
            ..Default::default()
        };
        assert!(Harness::new(config).is_err());
    }

    #[tokio::test]
    async fn test_missing_directory_fails_before_trials() {
        let dir = tempfile::tempdir().unwrap();
        let config = HarnessConfig {
            executables_dir: dir.path().join("missing"),
            ..Default::default()
        };

        let harness = Harness::new(config).unwrap();
        assert!(harness.run().await.is_err());
    }

    #[cfg(unix)]
    mod end_to_end {
        use super::*;
        use crate::utils::fixture::write_script as write_exe;
        use std::path::Path;

        fn config(dir: &Path, repeats: u32, levels: Vec<u32>) -> HarnessConfig {
            HarnessConfig {
                executables_dir: dir.to_path_buf(),
                levels,
                repeats,
                ..Default::default()
            }
        }

        #[tokio::test]
        async fn test_serial_target_mean() {
            let dir = tempfile::tempdir().unwrap();
            write_exe(dir.path(), "sw_basic", r#"echo "Total time: 1.000""#);

            let report = Harness::new(config(dir.path(), 3, vec![1]))
                .unwrap()
                .run()
                .await
                .unwrap();

            assert_eq!(report.results.len(), 1);
            let result = &report.results[0];
            assert_eq!(result.target, "sw_basic");
            assert_eq!(result.level, None);
            assert_eq!(result.attempted, 3);
            assert_eq!(
                result.mean_secs.map(|m| format!("{m:.6}")).as_deref(),
                Some("1.000000")
            );
        }

        #[tokio::test]
        async fn test_failing_target_has_no_data() {
            let dir = tempfile::tempdir().unwrap();
            write_exe(dir.path(), "sw_basic", "echo \"Total time: 1.000\"\nexit 1");

            let report = Harness::new(config(dir.path(), 3, vec![1]))
                .unwrap()
                .run()
                .await
                .unwrap();

            assert_eq!(report.results.len(), 1);
            assert_eq!(report.results[0].mean_secs, None);
            assert_eq!(report.no_data_count(), 1);
        }

        #[tokio::test]
        async fn test_parallel_target_sweep() {
            let dir = tempfile::tempdir().unwrap();
            write_exe(
                dir.path(),
                "sw_omp",
                r#"echo "Total time: ${OMP_NUM_THREADS}.0""#,
            );

            let report = Harness::new(config(dir.path(), 2, vec![1, 2]))
                .unwrap()
                .run()
                .await
                .unwrap();

            let rows: Vec<_> = report
                .results
                .iter()
                .map(|r| (r.level, r.mean_secs.map(|m| format!("{m:.6}"))))
                .collect();
            assert_eq!(
                rows,
                vec![
                    (Some(1), Some("1.000000".to_string())),
                    (Some(2), Some("2.000000".to_string())),
                ]
            );
        }

        #[tokio::test]
        async fn test_passes_fixed_arguments() {
            let dir = tempfile::tempdir().unwrap();
            write_exe(
                dir.path(),
                "sw_args",
                r#"[ "$*" = "--substitution_matrix m.txt --files q.fasta d.fasta" ] || exit 1
echo "Total time: 4.0""#,
            );

            let config = HarnessConfig {
                substitution_matrix: "m.txt".into(),
                sequence_files: vec!["q.fasta".into(), "d.fasta".into()],
                ..config(dir.path(), 1, vec![1])
            };
            let report = Harness::new(config).unwrap().run().await.unwrap();

            assert_eq!(report.results[0].mean_secs, Some(4.0));
        }
    }
}
