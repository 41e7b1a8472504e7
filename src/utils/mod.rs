//! Shared helpers for logging and timing

#[cfg(all(test, unix))]
pub mod fixture;
mod logger;
mod timer;

pub use logger::{init_logger, LogLevel};
pub use timer::{format_duration, Timer};
