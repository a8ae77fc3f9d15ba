//! HTTP-backed rate provider.

use std::time::Duration;

use async_trait::async_trait;
use fxgate_common::CurrencyPair;
use tracing::{debug, instrument, warn};

use crate::endpoint::{build_request_url, redact_api_key};
use crate::error::{FxError, FxResult};
use crate::provider::RateProvider;
use crate::response::extract_rate;

/// Configuration for the HTTP rate provider.
#[derive(Debug, Clone)]
pub struct HttpProviderConfig {
    /// URL template; empty selects the default endpoint.
    pub api_url: String,
    /// API key substituted for `{APIKEY}`.
    pub api_key: String,
    /// Bound on every request, connect through body.
    pub timeout: Duration,
}

impl Default for HttpProviderConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            api_key: String::new(),
            timeout: Duration::from_secs(15),
        }
    }
}

/// Rate provider calling a configurable FX HTTP API.
pub struct HttpRateProvider {
    config: HttpProviderConfig,
    client: reqwest::Client,
}

impl HttpRateProvider {
    /// Create a provider with its own bounded client.
    pub fn new(config: HttpProviderConfig) -> FxResult<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    /// URL that would be requested for `pair`.
    pub fn request_url(&self, pair: &CurrencyPair) -> String {
        build_request_url(&self.config.api_url, &self.config.api_key, pair)
    }
}

#[async_trait]
impl RateProvider for HttpRateProvider {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self, pair), fields(pair = %pair))]
    async fn fetch_rate(&self, pair: &CurrencyPair) -> FxResult<f64> {
        let url = self.request_url(pair);

        let response = self
            .client
            .get(&url)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| FxError::Transport(e.without_url()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| FxError::Transport(e.without_url()))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Rate API returned non-success status");
            return Err(FxError::Upstream {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        match extract_rate(&body, &pair.to) {
            Some((shape, rate)) => {
                debug!(shape, rate, "Decoded rate from provider");
                Ok(rate)
            }
            None => Err(FxError::UnrecognizedResponse {
                url: redact_api_key(&url, &self.config.api_key),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, Router};
    use fxgate_common::Currency;
    use tokio::net::TcpListener;

    /// Serve a fixed status and body on an ephemeral port.
    async fn serve(status: StatusCode, body: &'static str) -> String {
        let app = Router::new().fallback(move || async move { (status, body) });
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/rate?from={{FROM}}&to={{TO}}&key={{APIKEY}}")
    }

    async fn provider_for(status: StatusCode, body: &'static str) -> HttpRateProvider {
        let config = HttpProviderConfig {
            api_url: serve(status, body).await,
            api_key: "apikey123".to_string(),
            ..Default::default()
        };
        HttpRateProvider::new(config).unwrap()
    }

    fn usd_etb() -> CurrencyPair {
        CurrencyPair::new(Currency::usd(), Currency::etb())
    }

    #[tokio::test]
    async fn test_result_shape() {
        let provider = provider_for(StatusCode::OK, r#"{"result": 56.78}"#).await;
        let rate = provider.fetch_rate(&usd_etb()).await.unwrap();
        assert!((rate - 56.78).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_string_rates_shape() {
        let provider = provider_for(StatusCode::OK, r#"{"rates": {"ETB": "56.78"}}"#).await;
        let rate = provider.fetch_rate(&usd_etb()).await.unwrap();
        assert!((rate - 56.78).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_numeric_rates_shape() {
        let provider = provider_for(StatusCode::OK, r#"{"rates": {"ETB": 56.78}}"#).await;
        let rate = provider.fetch_rate(&usd_etb()).await.unwrap();
        assert!((rate - 56.78).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_conversion_rates_shape() {
        let provider =
            provider_for(StatusCode::OK, r#"{"conversion_rates": {"ETB": 56.78}}"#).await;
        let rate = provider.fetch_rate(&usd_etb()).await.unwrap();
        assert!((rate - 56.78).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_bad_status() {
        let provider = provider_for(StatusCode::BAD_GATEWAY, "nope").await;
        let result = provider.fetch_rate(&usd_etb()).await;

        match result {
            Err(FxError::Upstream { status, body }) => {
                assert_eq!(status, 502);
                assert_eq!(body, "nope");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unrecognized_response_names_url() {
        let provider = provider_for(StatusCode::OK, r#"{"rates": {"EUR": 0.9}}"#).await;
        let result = provider.fetch_rate(&usd_etb()).await;

        match result {
            Err(FxError::UnrecognizedResponse { url }) => {
                assert!(url.contains("from=USD&to=ETB&key=***"));
                assert!(!url.contains("apikey123"));
            }
            other => panic!("expected unrecognized response, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = HttpProviderConfig {
            api_url: format!("http://{addr}/rate"),
            ..Default::default()
        };
        let provider = HttpRateProvider::new(config).unwrap();

        let result = provider.fetch_rate(&usd_etb()).await;
        assert!(matches!(result, Err(FxError::Transport(_))));
        assert!(!result.unwrap_err().to_string().contains("127.0.0.1"));
    }

    #[test]
    fn test_request_url_uses_default_template() {
        let provider = HttpRateProvider::new(HttpProviderConfig::default()).unwrap();
        let url = provider.request_url(&usd_etb());
        assert!(url.contains("exchangerate.host/convert"));
    }
}
