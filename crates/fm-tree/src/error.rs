//! Error types for the fm-tree crate.
//!
//! # Error Recovery Strategy
//!
//! Nothing in here is recoverable by the pipeline itself. Per-line problems
//! never reach this type: they are [`LineRejection`](fm_parser::LineRejection)s,
//! counted in [`RunStats`](crate::RunStats) and skipped. What remains is
//! either bad configuration or an input with nothing usable in it.

use fm_core::{ClassificationTag, ConfigError};
use fm_parser::ParseError;

/// Errors raised while compiling classification rules.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    /// A rule pattern is not a valid regular expression.
    #[error("invalid pattern for rule '{tag}': {source}")]
    InvalidPattern {
        /// Tag of the offending rule.
        tag: ClassificationTag,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },
}

/// Errors that stop a pipeline run.
///
/// # Examples
///
/// ```
/// use fm_tree::PipelineError;
///
/// let err = PipelineError::NoRecords { lines: 12 };
/// assert_eq!(err.to_string(), "no valid records found in 12 input lines");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The line parser could not be built.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The classifier could not be built.
    #[error(transparent)]
    Classify(#[from] ClassifyError),

    /// Every input line was rejected.
    #[error("no valid records found in {lines} input lines")]
    NoRecords {
        /// Number of lines read.
        lines: usize,
    },
}

impl PipelineError {
    /// Returns `true` if the run never started because of bad configuration.
    #[inline]
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Parse(_) | Self::Classify(_))
    }

    /// Returns `true` if the input was read but held nothing usable.
    #[inline]
    #[must_use]
    pub const fn is_empty_input(&self) -> bool {
        matches!(self, Self::NoRecords { .. })
    }
}
