//! Executable discovery
//!
//! Lists a directory and keeps the regular files the current process may
//! execute. Everything else is skipped.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::models::BenchmarkTarget;

/// Discover benchmark targets in `dir`, in directory listing order.
///
/// Fails only when the directory itself cannot be read.
pub fn discover(dir: &Path, parallel_marker: &str) -> Result<Vec<BenchmarkTarget>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read executables directory: {}", dir.display()))?;

    let mut targets = Vec::new();

    for entry in entries {
        let entry = entry
            .with_context(|| format!("Failed to list executables directory: {}", dir.display()))?;
        let path = entry.path();

        // Follows symlinks; dangling links are skipped like any non-file
        let Ok(metadata) = fs::metadata(&path) else {
            debug!("Skipping unreadable entry {}", path.display());
            continue;
        };

        if !metadata.is_file() || !is_executable(&path) {
            debug!("Skipping {}", path.display());
            continue;
        }

        let target = BenchmarkTarget::new(path, parallel_marker);
        debug!("Discovered {}", target);
        targets.push(target);
    }

    info!(
        "Discovered {} executable(s) in {}",
        targets.len(),
        dir.display()
    );

    Ok(targets)
}

/// Whether the current process may execute `path`, per access(2)
#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use nix::unistd::{access, AccessFlags};
    access(path, AccessFlags::X_OK).is_ok()
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    true
}
