//! Error taxonomy for the feature-extraction pipeline.
//!
//! Structural problems (wrong tensor rank, mismatched label counts, invalid
//! parameters) fail fast before any computation. Numeric degeneracies —
//! zero-variance segments, zero-energy decompositions, flat fractal inputs —
//! are *not* errors: they propagate as IEEE NaN/Inf in the output tensor so
//! that pathological-but-legitimate inputs (flat/DC signals) never abort a
//! batch.
use thiserror::Error;

/// Errors raised by segmentation and feature functions.
#[derive(Debug, Error)]
pub enum Error {
    /// Input tensor rank does not match what the function requires.
    #[error("expected a tensor with {expected} axes, got {got}")]
    Rank { expected: usize, got: usize },

    /// Label array's first axis does not match the trial count.
    #[error("label count {labels} does not match trial count {trials}")]
    LabelMismatch { labels: usize, trials: usize },

    /// Invalid parameter value (band boundaries, window sizes, orders, …).
    #[error("invalid parameter: {0}")]
    Parameter(String),
}

pub type Result<T> = std::result::Result<T, Error>;
