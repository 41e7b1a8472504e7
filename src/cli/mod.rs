//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::HarnessConfig;

/// Benchmark harness for sequence-alignment executables
#[derive(Parser, Debug)]
#[command(name = "align-bench")]
#[command(version)]
#[command(about = "Run alignment executables repeatedly and report their average time")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Discover and benchmark every executable
    Run(RunArgs),

    /// List discovered executables and their run plan
    List(ListArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Arguments for run command
#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// Directory containing benchmark executables
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Substitution matrix passed to every executable
    #[arg(short = 'm', long)]
    pub substitution_matrix: Option<PathBuf>,

    /// Sequence files passed to every executable
    #[arg(short, long, num_args = 1..)]
    pub files: Option<Vec<PathBuf>>,

    /// Thread counts to sweep (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub levels: Option<Vec<u32>>,

    /// Trials per configuration
    #[arg(short, long)]
    pub repeats: Option<u32>,

    /// Environment variable set to the thread count
    #[arg(long)]
    pub thread_var: Option<String>,

    /// File-name substring marking parallel executables
    #[arg(long)]
    pub parallel_marker: Option<String>,

    /// Label printed before the elapsed seconds
    #[arg(long)]
    pub time_marker: Option<String>,

    /// Per-trial timeout in seconds (unbounded when omitted)
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Output format (table, json, json-pretty, csv)
    #[arg(long)]
    pub format: Option<String>,

    /// Also write the report to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl RunArgs {
    /// Apply command-line overrides on top of `config`
    pub fn apply(&self, config: &mut HarnessConfig) {
        if let Some(dir) = &self.dir {
            config.executables_dir = dir.clone();
        }
        if let Some(matrix) = &self.substitution_matrix {
            config.substitution_matrix = matrix.clone();
        }
        if let Some(files) = &self.files {
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
        if let Some(marker) = &self.time_marker {
            config.time_marker = marker.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = Some(timeout);
        }
    }
}

/// Arguments for list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Directory containing benchmark executables
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// File-name substring marking parallel executables
    #[arg(long)]
    pub parallel_marker: Option<String>,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a configuration file with default settings
    Init {
        /// Output path
        #[arg(short, long, default_value = "align-bench.yaml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Show {
        /// Output format (yaml, json)
        #[arg(short, long, default_value = "yaml")]
        format: String,
    },

    /// Show supported environment variables and their current values
    Env,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_args_parsing() {
        let args = Args::parse_from([
            "align-bench",
            "run",
            "--dir",
            "bin",
            "--levels",
            "1,2,4",
            "--repeats",
            "3",
            "--files",
            "q.fasta",
            "db.fasta",
        ]);
        match args.command {
            Command::Run(run_args) => {
                assert_eq!(run_args.dir, Some(PathBuf::from("bin")));
                assert_eq!(run_args.levels, Some(vec![1, 2, 4]));
                assert_eq!(run_args.repeats, Some(3));
                assert_eq!(
                    run_args.files,
                    Some(vec![PathBuf::from("q.fasta"), PathBuf::from("db.fasta")])
                );
                assert_eq!(run_args.timeout, None);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let args = Args::parse_from(["align-bench", "list", "--verbose", "-c", "bench.yaml"]);
        assert!(args.verbose);
        assert_eq!(args.config, Some(PathBuf::from("bench.yaml")));
        assert!(matches!(args.command, Command::List(_)));
    }

    #[test]
    fn test_config_init_defaults() {
        let args = Args::parse_from(["align-bench", "config", "init"]);
        match args.command {
            Command::Config(ConfigArgs {
                action: ConfigAction::Init { output, force },
            }) => {
                assert_eq!(output, PathBuf::from("align-bench.yaml"));
                assert!(!force);
            }
            _ => panic!("Expected Config Init command"),
        }
    }

    #[test]
    fn test_apply_overrides() {
        let run_args = RunArgs {
            repeats: Some(2),
            levels: Some(vec![2, 8]),
            timeout: Some(120),
            ..Default::default()
        };
        let mut config = HarnessConfig::default();
        run_args.apply(&mut config);

        assert_eq!(config.repeats, 2);
        assert_eq!(config.levels, vec![2, 8]);
        assert_eq!(config.timeout_secs, Some(120));
        assert_eq!(config.thread_var, "OMP_NUM_THREADS");
    }
}
