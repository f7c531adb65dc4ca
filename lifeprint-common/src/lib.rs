//! Common types and utilities shared across the Lifeprint index crates.
//!
//! This crate defines the shared error type, the extractor selection enum,
//! default constants, and observability helpers used throughout the
//! workspace. It stays small so that every crate can depend on it.
//!
//! # Overview
//!
//! - [`IndexError`] and [`Result`]: Shared error handling
//! - [`ExtractStrategy`]: Which anchor extractor(s) a run may use
//! - [`observability`]: Centralised tracing/logging initialisation
//!
//! # Examples
//!
//! ```rust
//! use lifeprint_common::{ExtractStrategy, DEFAULT_CONTAINER_ID};
//!
//! let strategy: ExtractStrategy = "pattern".parse().unwrap();
//! assert_eq!(strategy, ExtractStrategy::Pattern);
//! assert_eq!(DEFAULT_CONTAINER_ID, "myUL");
//! ```
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod observability;

/// `id` attribute of the `<ul>` holding the sign links on a saved Lifeprint page.
pub const DEFAULT_CONTAINER_ID: &str = "myUL";
/// Value written to every index item's `source` field.
pub const DEFAULT_SOURCE_LABEL: &str = "Lifeprint";
/// Items printed when no output path is given.
pub const DEFAULT_PREVIEW_LIMIT: usize = 10;

/// Selects which anchor extractor(s) a run may use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractStrategy {
    /// DOM parser first, regex scan when the container cannot be found.
    #[default]
    Auto,
    /// DOM parser only.
    Structural,
    /// Regex scan only.
    Pattern,
}

impl ExtractStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractStrategy::Auto => "auto",
            ExtractStrategy::Structural => "structural",
            ExtractStrategy::Pattern => "pattern",
        }
    }
}

impl fmt::Display for ExtractStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtractStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ExtractStrategy::Auto),
            "structural" | "dom" => Ok(ExtractStrategy::Structural),
            "pattern" | "regex" => Ok(ExtractStrategy::Pattern),
            other => Err(format!(
                "unknown strategy `{other}` (expected auto, structural or pattern)"
            )),
        }
    }
}

/// Error types used across the index pipeline.
#[derive(thiserror::Error, Debug)]
pub enum IndexError {
    /// The input document could not be read.
    #[error("failed to read input {}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The destination directory or file could not be written.
    #[error("failed to write output {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The index could not be encoded as JSON.
    #[error("JSON encoding failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Writing to stdout/stderr failed.
    #[error("channel write failed: {0}")]
    Channel(#[source] std::io::Error),

    /// The container matcher could not be compiled.
    #[error("invalid container pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The container selector could not be parsed.
    #[error("invalid container selector: {0}")]
    Selector(String),

    /// A strategy was requested that this build does not include.
    #[error("extract strategy `{0}` is not available in this build")]
    StrategyUnavailable(&'static str),
}

/// Convenient alias for results that use [`IndexError`].
pub type Result<T> = std::result::Result<T, IndexError>;
