//! FX resolver error types.

use std::time::Duration;

use fxgate_common::CurrencyError;
use thiserror::Error;

/// Errors that can occur while resolving a rate.
#[derive(Debug, Error)]
pub enum FxError {
    /// Missing currency code or malformed amount.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Provider answered with a non-2xx status.
    #[error("fx api non-ok: {status} - {body}")]
    Upstream { status: u16, body: String },

    /// Provider answered 2xx but no known response shape matched.
    #[error("unrecognized fx response for {url}")]
    UnrecognizedResponse { url: String },

    /// Connection, timeout, or body read failure talking to the provider.
    #[error("fx transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The caller's deadline fired before resolution finished.
    #[error("fx resolution timed out after {0:?}")]
    Timeout(Duration),
}

impl FxError {
    /// Whether the caller is at fault (bad input) rather than the upstream.
    pub fn is_client_error(&self) -> bool {
        matches!(self, FxError::InvalidArgument(_))
    }
}

impl From<CurrencyError> for FxError {
    fn from(err: CurrencyError) -> Self {
        FxError::InvalidArgument(err.to_string())
    }
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;

/// Errors raised by a cache adapter. These never leave the resolver.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The backing store reported a failure.
    #[error("cache backend error: {0}")]
    Backend(#[from] redis::RedisError),

    /// The store did not answer in time.
    #[error("cache operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
