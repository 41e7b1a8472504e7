//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

use super::HarnessConfig;

/// Environment variable prefix
const ENV_PREFIX: &str = "ALIGN_BENCH";

/// Configuration overrides read from `ALIGN_BENCH_*` variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Executables directory from ALIGN_BENCH_DIR
    pub executables_dir: Option<PathBuf>,
    /// Substitution matrix from ALIGN_BENCH_MATRIX
    pub substitution_matrix: Option<PathBuf>,
    /// Sequence files from ALIGN_BENCH_FILES (comma separated)
    pub sequence_files: Option<Vec<PathBuf>>,
    /// Levels from ALIGN_BENCH_LEVELS (comma separated)
    pub levels: Option<Vec<u32>>,
    /// Repeats from ALIGN_BENCH_REPEATS
    pub repeats: Option<u32>,
    /// Thread variable from ALIGN_BENCH_THREAD_VAR
    pub thread_var: Option<String>,
    /// Parallel marker from ALIGN_BENCH_PARALLEL_MARKER
    pub parallel_marker: Option<String>,
    /// Timeout from ALIGN_BENCH_TIMEOUT
    pub timeout: Option<u64>,
    /// Output format from ALIGN_BENCH_FORMAT
    pub format: Option<String>,
    /// Config file from ALIGN_BENCH_CONFIG
    pub config_file: Option<PathBuf>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            executables_dir: get_env("DIR").map(PathBuf::from),
            substitution_matrix: get_env("MATRIX").map(PathBuf::from),
            sequence_files: get_env("FILES").map(|v| split_list(&v).map(PathBuf::from).collect()),
            levels: get_env_list("LEVELS"),
            repeats: get_env_parse("REPEATS"),
            thread_var: get_env("THREAD_VAR"),
            parallel_marker: get_env("PARALLEL_MARKER"),
            timeout: get_env_parse("TIMEOUT"),
            format: get_env("FORMAT"),
            config_file: get_env("CONFIG").map(PathBuf::from),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.executables_dir.is_some()
            || self.substitution_matrix.is_some()
            || self.sequence_files.is_some()
            || self.levels.is_some()
            || self.repeats.is_some()
            || self.thread_var.is_some()
            || self.parallel_marker.is_some()
            || self.timeout.is_some()
            || self.format.is_some()
            || self.config_file.is_some()
    }

    /// Apply the overrides that are set
    pub fn apply(&self, config: &mut HarnessConfig) {
        if let Some(dir) = &self.executables_dir {
            config.executables_dir = dir.clone();
        }
        if let Some(matrix) = &self.substitution_matrix {
            config.substitution_matrix = matrix.clone();
        }
        if let Some(files) = &self.sequence_files {
            config.sequence_files = files.clone();
        }
        if let Some(levels) = &self.levels {
            config.levels = levels.clone();
        }
        if let Some(repeats) = self.repeats {
            config.repeats = repeats;
        }
        if let Some(var) = &self.thread_var {
            config.thread_var = var.clone();
        }
        if let Some(marker) = &self.parallel_marker {
            config.parallel_marker = marker.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = Some(timeout);
        }
    }

    /// Print current environment configuration
    pub fn print_summary(&self) {
        println!("Environment Configuration:");
        println!("  {}_DIR:             {:?}", ENV_PREFIX, self.executables_dir);
        println!("  {}_MATRIX:          {:?}", ENV_PREFIX, self.substitution_matrix);
        println!("  {}_FILES:           {:?}", ENV_PREFIX, self.sequence_files);
        println!("  {}_LEVELS:          {:?}", ENV_PREFIX, self.levels);
        println!("  {}_REPEATS:         {:?}", ENV_PREFIX, self.repeats);
        println!("  {}_THREAD_VAR:      {:?}", ENV_PREFIX, self.thread_var);
        println!("  {}_PARALLEL_MARKER: {:?}", ENV_PREFIX, self.parallel_marker);
        println!("  {}_TIMEOUT:         {:?}", ENV_PREFIX, self.timeout);
        println!("  {}_FORMAT:          {:?}", ENV_PREFIX, self.format);
        println!("  {}_CONFIG:          {:?}", ENV_PREFIX, self.config_file);
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}"))
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Get environment variable and parse to type
fn get_env_parse<T: FromStr>(name: &str) -> Option<T> {
    let raw = get_env(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}_{}: cannot parse '{}'", ENV_PREFIX, name, raw);
            None
        }
    }
}

/// Get a comma-separated environment variable as a list
fn get_env_list<T: FromStr>(name: &str) -> Option<Vec<T>> {
    let raw = get_env(name)?;
    match split_list(&raw).map(str::parse).collect::<Result<Vec<T>, _>>() {
        Ok(values) => Some(values),
        Err(_) => {
            warn!("Ignoring {}_{}: cannot parse '{}'", ENV_PREFIX, name, raw);
            None
        }
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Builder for setting environment variables (useful for testing)
#[cfg(test)]
pub struct EnvBuilder {
    vars: Vec<(String, String)>,
}

#[cfg(test)]
impl EnvBuilder {
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    /// Set `ALIGN_BENCH_<name>`
    pub fn var(mut self, name: &str, value: impl Into<String>) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_{name}"), value.into()));
        self
    }

    /// Apply and return guard that restores on drop
    pub fn apply_scoped(self) -> EnvGuard {
        let previous: Vec<_> = self
            .vars
            .iter()
            .map(|(k, _)| (k.clone(), env::var(k).ok()))
            .collect();

        for (key, value) in self.vars {
            env::set_var(key, value);
        }

        EnvGuard { previous }
    }
}

/// Guard that restores environment variables on drop
#[cfg(test)]
pub struct EnvGuard {
    previous: Vec<(String, Option<String>)>,
}

#[cfg(test)]
impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.previous {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}

/// Print all ALIGN_BENCH environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_DIR              Directory containing benchmark executables");
    println!("  {ENV_PREFIX}_MATRIX           Substitution matrix file");
    println!("  {ENV_PREFIX}_FILES            Sequence files (comma separated)");
    println!("  {ENV_PREFIX}_LEVELS           Thread counts to sweep (comma separated)");
    println!("  {ENV_PREFIX}_REPEATS          Trials per configuration");
    println!("  {ENV_PREFIX}_THREAD_VAR       Variable set to the thread count");
    println!("  {ENV_PREFIX}_PARALLEL_MARKER  File-name substring marking parallel targets");
    println!("  {ENV_PREFIX}_TIMEOUT          Per-trial timeout in seconds");
    println!("  {ENV_PREFIX}_FORMAT           Report format (table, json, csv)");
    println!("  {ENV_PREFIX}_CONFIG           Path to configuration file");
    println!();
    println!("Example:");
    println!("  export {ENV_PREFIX}_LEVELS=1,2,4,8");
    println!("  export {ENV_PREFIX}_REPEATS=3");
    println!("  align-bench run");
}
