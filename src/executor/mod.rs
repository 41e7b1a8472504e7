//! Process execution
//!
//! Launches target executables one at a time and captures their output.

mod runner;

pub use runner::{ProcessRunner, RunError};
