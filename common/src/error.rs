//! Error types for currency handling.

use thiserror::Error;

/// Errors raised while normalizing currency input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurrencyError {
    /// Nothing left after trimming whitespace and quotes.
    #[error("currency code is empty: {input:?}")]
    Empty { input: String },
}

/// Result type alias for currency operations.
pub type Result<T> = std::result::Result<T, CurrencyError>;
