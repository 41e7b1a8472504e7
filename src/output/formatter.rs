//! Output formatters for benchmark reports
//!
//! Provides Table, JSON and CSV output formats.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::benchmark::BenchmarkReport;
use crate::models::BenchmarkResult;

/// Decimal places used for mean times
const TIME_PRECISION: usize = 6;

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
    Csv,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" | "text" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "csv" => Some(OutputFormat::Csv),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::JsonPretty => write!(f, "json-pretty"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// One CSV row per result
#[derive(Serialize)]
struct CsvRow<'a> {
    target: &'a str,
    kind: &'a str,
    thread_var: Option<&'a str>,
    level: Option<u32>,
    mean_secs: Option<String>,
    succeeded: u32,
    attempted: u32,
}

/// Report formatter
pub struct ReportFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ReportFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    /// Render a whole report
    pub fn format_report(&self, report: &BenchmarkReport) -> Result<String> {
        match self.format {
            OutputFormat::Table => Ok(self.format_table(&report.results)),
            OutputFormat::Json => {
                serde_json::to_string(report).context("Failed to serialize report")
            }
            OutputFormat::JsonPretty => {
                serde_json::to_string_pretty(report).context("Failed to serialize report")
            }
            OutputFormat::Csv => self.format_csv(&report.results),
        }
    }

    /// One report line for a result
    pub fn format_result(&self, result: &BenchmarkResult) -> String {
        let mut name = result.target.clone();
        if let Some(label) = result.level_label() {
            name.push_str(&format!(" ({label})"));
        }

        let trials = format!("[{}/{} trials]", result.succeeded(), result.attempted);

        match result.mean_secs {
            Some(mean) => format!(
                "{name}: Average Total Time = {mean:.prec$} seconds {trials}",
                prec = TIME_PRECISION
            ),
            None if self.colorize => format!("{name}: \x1b[33mno data\x1b[0m {trials}"),
            None => format!("{name}: no data {trials}"),
        }
    }

    fn format_table(&self, results: &[BenchmarkResult]) -> String {
        let mut output = String::from("\nBenchmark Results:\n");

        if results.is_empty() {
            output.push_str("No benchmark targets found\n");
            return output;
        }

        for result in results {
            output.push_str(&self.format_result(result));
            output.push('\n');
        }
        output
    }

    fn format_csv(&self, results: &[BenchmarkResult]) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        for result in results {
            writer
                .serialize(CsvRow {
                    target: &result.target,
                    kind: result.kind.name(),
                    thread_var: result.thread_var.as_deref(),
                    level: result.level,
                    mean_secs: result
                        .mean_secs
                        .map(|m| format!("{m:.prec$}", prec = TIME_PRECISION)),
                    succeeded: result.succeeded(),
                    attempted: result.attempted,
                })
                .context("Failed to write CSV row")?;
        }

        let bytes = writer.into_inner().context("Failed to flush CSV output")?;
        String::from_utf8(bytes).context("CSV output is not valid UTF-8")
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::Table)
    }
}

/// Fail early when `path` cannot be opened for writing. Creates the file.
pub fn ensure_writable(path: &Path) -> Result<()> {
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(|_| ())
        .with_context(|| format!("Cannot write report to {}", path.display()))
}

/// Write a report to a file, without colors
pub fn write_report_to_file(
    path: &Path,
    report: &BenchmarkReport,
    format: OutputFormat,
) -> Result<()> {
    let content = ReportFormatter::new(format).no_color().format_report(report)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report: {}", path.display()))
}
