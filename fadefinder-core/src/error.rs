//! Errors produced by a single query cycle.
//!
//! None of these are fatal: the next input change retries with fresh inputs.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("invalid date '{input}': expected YYYY-MM-DD")]
    InvalidDateFormat { input: String },

    #[error("no rows match the current filter")]
    EmptyResultSet,

    #[error("stop size must be finite and > 0, got {0}")]
    InvalidStopSize(f64),

    #[error("fee '{name}' must be finite, got {value}")]
    InvalidFee { name: &'static str, value: f64 },
}
