//! Timing extraction
//!
//! Pulls the elapsed-seconds value a target prints after its marker text,
//! e.g. `Total time: 12.345`.

use anyhow::{Context, Result};
use regex::Regex;
use thiserror::Error;

/// Why no value could be extracted from a run's output
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("'{marker}' not found in output")]
    MarkerNotFound { marker: String },

    #[error("'{marker}' is not followed by a number (found '{token}')")]
    InvalidNumber { marker: String, token: String },
}

/// Extracts a timing value following a fixed label
#[derive(Clone, Debug)]
pub struct ResultExtractor {
    marker: String,
    pattern: Regex,
}

impl ResultExtractor {
    /// Build an extractor for the given marker label
    pub fn new(marker: impl Into<String>) -> Result<Self> {
        let marker = marker.into();
        let pattern = Regex::new(&format!(r"{}\s*([0-9]*\.?[0-9]+)", regex::escape(&marker)))
            .with_context(|| format!("Invalid time marker: {marker}"))?;

        Ok(Self { marker, pattern })
    }

    /// Extract the first value in `output`. The first occurrence wins.
    pub fn extract(&self, output: &str) -> Result<f64, ExtractError> {
        let Some(start) = output.find(&self.marker) else {
            return Err(ExtractError::MarkerNotFound {
                marker: self.marker.clone(),
            });
        };

        // Anchor on the first marker so a later, well-formed one never
        // masks a malformed first occurrence.
        let first = &output[start..];
        let numeral = self
            .pattern
            .captures(first)
            .filter(|caps| caps.get(0).map(|m| m.start()) == Some(0))
            .and_then(|caps| caps.get(1));

        match numeral.map(|m| m.as_str().parse::<f64>()) {
            Some(Ok(value)) => Ok(value),
            _ => Err(ExtractError::InvalidNumber {
                marker: self.marker.clone(),
                token: following_token(&first[self.marker.len()..]),
            }),
        }
    }
}

/// First whitespace-delimited token after the marker, for diagnostics
fn following_token(rest: &str) -> String {
    rest.split_whitespace().next().unwrap_or("").to_string()
}
