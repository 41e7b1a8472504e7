//! Sweep control
//!
//! Decides the run plan for a target and drives the aggregator over it.

use std::sync::Arc;
use tracing::info;

use super::aggregator::TrialAggregator;
use crate::models::{BenchmarkResult, BenchmarkTarget, InvocationSpec, TargetKind};

/// Builds run plans and executes them level by level
#[derive(Clone, Debug)]
pub struct SweepController {
    aggregator: TrialAggregator,
    args: Arc<[String]>,
    thread_var: String,
    levels: Vec<u32>,
}

impl SweepController {
    pub fn new(
        aggregator: TrialAggregator,
        args: Vec<String>,
        thread_var: impl Into<String>,
        levels: Vec<u32>,
    ) -> Self {
        Self {
            aggregator,
            args: Arc::from(args),
            thread_var: thread_var.into(),
            levels,
        }
    }

    /// Invocation specs for `kind`, in execution order
    pub fn plan(&self, kind: TargetKind) -> Vec<InvocationSpec> {
        match kind {
            TargetKind::Serial => vec![InvocationSpec::serial(self.args.clone())],
            TargetKind::Parallel => self
                .levels
                .iter()
                .map(|&level| {
                    InvocationSpec::with_level(self.args.clone(), &self.thread_var, level)
                })
                .collect(),
        }
    }

    /// Run every planned invocation for `target`.
    ///
    /// A level without data still yields a result and the sweep goes on.
    pub async fn run(&self, target: &BenchmarkTarget) -> Vec<BenchmarkResult> {
        let plan = self.plan(target.kind());
        info!(
            "Benchmarking {} ({} configuration{}, {} trials each)",
            target,
            plan.len(),
            if plan.len() == 1 { "" } else { "s" },
            self.aggregator.repeats()
        );

        let mut results = Vec::with_capacity(plan.len());
        for spec in &plan {
            results.push(self.aggregator.aggregate(target, spec).await);
        }
        results
    }
}
