//! Output formatting module
//!
//! Renders benchmark reports for the console and for files.

mod formatter;

pub use formatter::{ensure_writable, write_report_to_file, OutputFormat, ReportFormatter};
