//! Data models for the benchmark harness
//!
//! Targets, invocation specs and aggregated results.

mod invocation;
mod result;
mod target;

pub use invocation::{BaseEnvironment, InvocationSpec};
#[cfg(test)]
pub use invocation::EnvOverride;
pub use result::BenchmarkResult;
pub use target::{BenchmarkTarget, TargetKind};
