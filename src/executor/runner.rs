//! Process runner
//!
//! Launches one target executable with the fixed argument vector and a
//! derived environment, then waits for it to finish.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

use crate::models::{BaseEnvironment, InvocationSpec};
use crate::utils::Timer;

/// Longest stderr excerpt carried in a diagnostic
const STDERR_EXCERPT_LEN: usize = 512;

/// Per-run failures. None of these abort the harness.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("failed to launch {}: {source}", .path.display())]
    Launch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} exited with {}{}", .path.display(), exit_label(.code), stderr_suffix(.stderr))]
    NonZeroExit {
        path: PathBuf,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{} did not finish within {secs} seconds", .path.display())]
    TimedOut { path: PathBuf, secs: u64 },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

/// Captured output of a successful run
#[derive(Clone, Debug)]
pub struct RunOutput {
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

/// Runs target executables one at a time
#[derive(Clone, Debug)]
pub struct ProcessRunner {
    base_env: BaseEnvironment,
    timeout_secs: Option<u64>,
}

impl ProcessRunner {
    /// Create a runner over an environment snapshot
    pub fn new(base_env: BaseEnvironment) -> Self {
        Self {
            base_env,
            timeout_secs: None,
        }
    }

    /// Bound each run; `None` waits indefinitely
    pub fn with_timeout(mut self, secs: Option<u64>) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Run `path` once and wait for it to exit
    pub async fn run(&self, path: &Path, spec: &InvocationSpec) -> Result<RunOutput, RunError> {
        let mut command = Command::new(path);
        command
            .args(spec.args.iter())
            .env_clear()
            .envs(self.base_env.derive(spec.env_override.as_ref()))
            .stdin(Stdio::null())
            .kill_on_drop(true);

        debug!(
            "Launching {} {}{}",
            path.display(),
            spec.args.join(" "),
            spec.label().map(|l| format!(" with {l}")).unwrap_or_default()
        );

        let timer = Timer::start(path.display().to_string());
        let output = match self.timeout_secs {
            None => command.output().await,
            Some(secs) => {
                match tokio::time::timeout(Duration::from_secs(secs), command.output()).await {
                    Ok(output) => output,
                    Err(_) => {
                        return Err(RunError::TimedOut {
                            path: path.to_path_buf(),
                            secs,
                        })
                    }
                }
            }
        }
        .map_err(|source| RunError::Launch {
            path: path.to_path_buf(),
            source,
        })?;
        let elapsed = timer.stop();

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(RunError::NonZeroExit {
                path: path.to_path_buf(),
                code: output.status.code(),
                stderr: excerpt(&stderr),
            });
        }

        Ok(RunOutput {
            stdout,
            stderr,
            elapsed,
        })
    }
}

/// Trimmed tail of the stderr text, bounded in length
fn excerpt(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.len() <= STDERR_EXCERPT_LEN {
        return trimmed.to_string();
    }
    let mut start = trimmed.len() - STDERR_EXCERPT_LEN;
    while !trimmed.is_char_boundary(start) {
        start += 1;
    }
    format!("...{}", &trimmed[start..])
}
