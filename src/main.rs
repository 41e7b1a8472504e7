//! align-bench - Benchmark harness for sequence-alignment executables
//!
//! Discovers the executables in a directory, runs each one repeatedly with
//! a fixed command line, and reports the average of the `Total time:` value
//! they print.
//!
//! ## Features
//!
//! - Executables whose name contains a marker (`omp` by default) are swept
//!   over a list of thread counts passed through `OMP_NUM_THREADS`
//! - Failed trials are reported inline and excluded from the mean
//! - Configuration from file, `ALIGN_BENCH_*` variables, and flags
//! - Multiple report formats (Table, JSON, CSV)
//!
//! ## Usage
//!
//! ```bash
//! # Benchmark everything in ../executables with the default sweep
//! align-bench run
//!
//! # Fewer trials and a shorter sweep
//! align-bench run --repeats 3 --levels 1,4,16
//!
//! # Show what would be run
//! align-bench list --dir ./bin
//!
//! # Write a configuration file with the defaults
//! align-bench config init
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

mod benchmark;
mod cli;
mod config;
mod discovery;
mod executor;
mod models;
mod output;
mod utils;

use benchmark::Harness;
use cli::Args;
use config::{EnvConfig, HarnessConfig};
use output::{OutputFormat, ReportFormatter};
use utils::LogLevel;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        LogLevel::Debug
    } else {
        LogLevel::from_str(&args.log_level).unwrap_or(LogLevel::Info)
    };
    utils::init_logger(level);

    let env = EnvConfig::load();

    match args.command {
        cli::Command::Run(run_args) => {
            run_benchmarks(args.config.as_deref(), &env, run_args).await?;
        }
        cli::Command::List(list_args) => {
            list_targets(args.config.as_deref(), &env, list_args)?;
        }
        cli::Command::Config(config_args) => {
            manage_config(args.config.as_deref(), &env, config_args)?;
        }
    }

    Ok(())
}

async fn run_benchmarks(
    config_path: Option<&std::path::Path>,
    env: &EnvConfig,
    args: cli::RunArgs,
) -> Result<()> {
    let mut config = HarnessConfig::resolve(config_path, env)?;
    args.apply(&mut config);

    let format_name = args
        .format
        .clone()
        .or_else(|| env.format.clone())
        .unwrap_or_else(|| "table".to_string());
    let format = OutputFormat::from_str(&format_name)
        .ok_or_else(|| anyhow::anyhow!("Unknown output format: {format_name}"))?;
    if let Some(path) = &args.output {
        output::ensure_writable(path)?;
    }

    let harness = Harness::new(config)?;
    let config = harness.config();

    info!(
        "Benchmarking executables in {} ({} trials, {} levels {:?} via {})",
        config.executables_dir.display(),
        config.repeats,
        config.levels.len(),
        config.levels,
        config.thread_var
    );
    match config.timeout_secs {
        Some(secs) => info!("Per-trial timeout: {}s", secs),
        None => info!("No per-trial timeout; a hung executable blocks the run"),
    }

    let report = harness.run().await?;

    let mut formatter = ReportFormatter::new(format);
    if args.no_color {
        formatter = formatter.no_color();
    }
    println!("{}", formatter.format_report(&report)?);

    if let Some(path) = &args.output {
        output::write_report_to_file(path, &report, format)?;
        info!("Report written to {} ({})", path.display(), format);
    }

    Ok(())
}

fn list_targets(
    config_path: Option<&std::path::Path>,
    env: &EnvConfig,
    args: cli::ListArgs,
) -> Result<()> {
    let mut config = HarnessConfig::resolve(config_path, env)?;
    if let Some(dir) = args.dir {
        config.executables_dir = dir;
    }
    if let Some(marker) = args.parallel_marker {
        config.parallel_marker = marker;
    }

    let harness = Harness::new(config)?;
    let targets = harness.discover()?;

    println!(
        "\nExecutables in {} ({} found)\n",
        harness.config().executables_dir.display(),
        targets.len()
    );

    for target in &targets {
        let plan = harness.sweep().plan(target.kind());
        let levels: Vec<String> = plan.iter().filter_map(|spec| spec.label()).collect();

        if levels.is_empty() {
            println!("  {:30} {:8} 1 configuration", target.name(), target.kind());
        } else {
            println!(
                "  {:30} {:8} {}",
                target.name(),
                target.kind(),
                levels.join(", ")
            );
        }
    }
    println!();

    Ok(())
}

fn manage_config(
    config_path: Option<&std::path::Path>,
    env: &EnvConfig,
    args: cli::ConfigArgs,
) -> Result<()> {
    match args.action {
        cli::ConfigAction::Init { output, force } => {
            if output.exists() && !force {
                anyhow::bail!(
                    "Configuration file already exists: {}. Use --force to overwrite.",
                    output.display()
                );
            }

            HarnessConfig::default().save(&output)?;
            println!("✓ Configuration file created: {}", output.display());
            println!("\nEdit the file to customize your settings.");
        }

        cli::ConfigAction::Show { format } => {
            let config = HarnessConfig::resolve(config_path, env)?;
            let output = if format == "json" {
                serde_json::to_string_pretty(&config)?
            } else {
                serde_yaml::to_string(&config)?
            };
            println!("{output}");
        }

        cli::ConfigAction::Env => {
            config::print_env_help();
            println!();
            if env.has_any() {
                env.print_summary();
            } else {
                println!("No ALIGN_BENCH_* variables are set.");
            }
        }
    }

    Ok(())
}
