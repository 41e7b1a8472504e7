//! Benchmark execution
//!
//! Timing extraction, trial aggregation, level sweeps and the harness
//! driver that ties them together.

mod aggregator;
mod extractor;
mod harness;
mod report;
mod sweep;

pub use harness::Harness;
pub use report::BenchmarkReport;
