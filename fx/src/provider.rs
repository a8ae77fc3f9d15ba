//! Rate provider trait and test double.

use async_trait::async_trait;
use fxgate_common::CurrencyPair;

use crate::error::FxResult;

/// Trait for FX rate sources.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Get the provider name.
    fn name(&self) -> &str;

    /// Fetch the rate for a canonical currency pair.
    async fn fetch_rate(&self, pair: &CurrencyPair) -> FxResult<f64>;
}

#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockRateProvider;

#[cfg(any(test, feature = "test-utils"))]
mod mock {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use dashmap::DashMap;
    use fxgate_common::CurrencyPair;

    use super::RateProvider;
    use crate::error::{FxError, FxResult};

    /// In-memory rate provider that counts calls.
    pub struct MockRateProvider {
        name: String,
        rates: DashMap<CurrencyPair, f64>,
        failure: Option<(u16, String)>,
        delay: Option<Duration>,
        calls: AtomicUsize,
    }

    impl MockRateProvider {
        /// Create a new mock provider with no rates.
        pub fn new(name: impl Into<String>) -> Self {
            Self {
                name: name.into(),
                rates: DashMap::new(),
                failure: None,
                delay: None,
                calls: AtomicUsize::new(0),
            }
        }

        /// Answer every call with an upstream error.
        pub fn failing(mut self, status: u16, body: impl Into<String>) -> Self {
            self.failure = Some((status, body.into()));
            self
        }

        /// Sleep before answering.
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        /// Set the rate returned for a pair.
        pub fn set_rate(&self, pair: CurrencyPair, rate: f64) {
            self.rates.insert(pair, rate);
        }

        /// Number of `fetch_rate` calls so far.
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RateProvider for MockRateProvider {
        fn name(&self) -> &str {
            &self.name
        }

        async fn fetch_rate(&self, pair: &CurrencyPair) -> FxResult<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            if let Some((status, body)) = &self.failure {
                return Err(FxError::Upstream {
                    status: *status,
                    body: body.clone(),
                });
            }

            self.rates
                .get(pair)
                .map(|r| *r)
                .ok_or_else(|| FxError::Upstream {
                    status: 404,
                    body: format!("no rate for {pair}"),
                })
        }
    }
}
