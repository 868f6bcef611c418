//! Error types for alpha factor computations.

use crate::FactorFamily;
use thiserror::Error;

/// Result type for alpha factor operations.
pub type Result<T> = std::result::Result<T, AlphaError>;

/// Errors that can occur while computing or assembling alpha factors.
#[derive(Debug, Error)]
pub enum AlphaError {
    /// Bar history is empty or malformed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Bar history is shorter than the family's hard minimum
    #[error("Insufficient data for {family}: need at least {required} bars, got {available}")]
    InsufficientData {
        /// Family that rejected the history
        family: FactorFamily,
        /// Minimum number of bars
        required: usize,
        /// Number of bars supplied
        available: usize,
    },

    /// An operator window exceeds the available history
    #[error("Insufficient window for {factor}: series exhausted before the latest sample")]
    InsufficientWindow {
        /// Factor whose intermediate series came out empty
        factor: String,
    },

    /// Unexpected fault inside a single factor formula
    #[error("Computation error in {factor}: {reason}")]
    Computation {
        /// Offending factor
        factor: String,
        /// What went wrong
        reason: String,
    },

    /// Factor needs data outside the engine (industry classification, market cap)
    #[error("Unsupported factor: {0} requires cross-sectional data")]
    Unsupported(String),

    /// Feature names disagree with the expected order
    #[error("Order mismatch at index {index}: expected {expected}, got {actual}")]
    OrderMismatch {
        /// First differing position
        index: usize,
        /// Name expected at that position
        expected: String,
        /// Name found at that position
        actual: String,
    },

    /// Feature name lists have different lengths
    #[error("Length mismatch: expected {expected} names, got {actual}")]
    LengthMismatch {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Non-finite values rejected by the fail-fast strategy
    #[error(
        "Non-finite values for {symbol} at {timestamp}: {nan_count} NaN, {inf_count} infinite ({detail})"
    )]
    NonFinite {
        /// Sample symbol
        symbol: String,
        /// Sample timestamp in seconds
        timestamp: i64,
        /// Number of NaN values
        nan_count: usize,
        /// Number of infinite values
        inf_count: usize,
        /// First offending factor or column
        detail: String,
    },

    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Missing required column in an input frame
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Batch job cancelled before this unit of work started
    #[error("Cancelled before computing {0}")]
    Cancelled(String),

    /// Polars DataFrame error
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// I/O error while exporting
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
