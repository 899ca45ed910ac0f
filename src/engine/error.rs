//! Engine error types.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised by the random engine or by a contract's engine binding.
#[derive(Debug, Error)]
pub enum EngineError {
    /// `range(start, stop, step)` contains no values.
    #[error("Empty range: range({start}, {stop}, {step})")]
    EmptyRange { start: i64, stop: i64, step: i64 },

    /// A distribution rejected its parameters.
    #[error("Distribution error: {0}")]
    Distribution(String),

    /// A binding asked for an argument the contract never validated.
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    /// The engine produced NaN or an infinity.
    #[error("Non-finite sample: {0}")]
    NonFinite(f64),

    /// The engine produced a sample that cannot be coerced to the result kind.
    #[error("Unexpected sample: expected {expected}, got {got}")]
    UnexpectedSample {
        expected: &'static str,
        got: String,
    },
}

impl EngineError {
    /// Wrap a distribution constructor error.
    pub fn distribution(err: impl std::fmt::Display) -> Self {
        Self::Distribution(err.to_string())
    }

    /// Create an "unexpected sample" error.
    pub fn unexpected(expected: &'static str, got: impl Into<String>) -> Self {
        Self::UnexpectedSample {
            expected,
            got: got.into(),
        }
    }
}
