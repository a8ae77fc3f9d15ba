use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use fxgate_common::{Currency, CurrencyPair};
use fxgate_fx::{MemoryCache, MockRateProvider, NoCache};
use fxgate_server::{app_router, AppState, ServerConfig};
use serde_json::Value;
use tower::ServiceExt;

fn usd_etb() -> CurrencyPair {
    CurrencyPair::new(Currency::usd(), Currency::etb())
}

fn app_with(provider: Arc<MockRateProvider>, config: &ServerConfig) -> Router {
    let state = Arc::new(AppState::new(provider, Arc::new(MemoryCache::new()), config));
    app_router(state, config)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn converts_amount() {
    let provider = Arc::new(MockRateProvider::new("test"));
    provider.set_rate(usd_etb(), 56.0);
    let app = app_with(provider.clone(), &ServerConfig::default());

    let (status, body) = get(app, "/fx?from=usd&to=etb&amount=2.5").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["from"], "USD");
    assert_eq!(body["to"], "ETB");
    assert_eq!(body["rate"], 56.0);
    assert_eq!(body["amount"], 2.5);
    assert_eq!(body["converted"], 140.0);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn defaults_to_one_usd_in_etb() {
    let provider = Arc::new(MockRateProvider::new("test"));
    provider.set_rate(usd_etb(), 1.23);
    let app = app_with(provider, &ServerConfig::default());

    let (status, body) = get(app, "/fx").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["from"], "USD");
    assert_eq!(body["to"], "ETB");
    assert_eq!(body["amount"], 1.0);
    assert_eq!(body["converted"], 1.23);
}

#[tokio::test]
async fn blank_codes_fall_back_to_defaults() {
    let provider = Arc::new(MockRateProvider::new("test"));
    provider.set_rate(usd_etb(), 2.0);
    let app = app_with(provider, &ServerConfig::default());

    let (status, body) = get(app, "/fx?from=&to=%20%22%22&amount=").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["from"], "USD");
    assert_eq!(body["to"], "ETB");
    assert_eq!(body["converted"], 2.0);
}

#[tokio::test]
async fn duplicate_params_use_first_value() {
    let provider = Arc::new(MockRateProvider::new("test"));
    provider.set_rate(usd_etb(), 56.0);
    let app = app_with(provider.clone(), &ServerConfig::default());

    let (status, body) = get(app, "/fx?from=usd&from=eur&to=etb&amount=2&amount=x").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["from"], "USD");
    assert_eq!(body["converted"], 112.0);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn bad_amount_is_rejected_without_provider_call() {
    let provider = Arc::new(MockRateProvider::new("test"));
    provider.set_rate(usd_etb(), 56.0);
    let app = app_with(provider.clone(), &ServerConfig::default());

    let (status, body) = get(app, "/fx?amount=abc").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
    assert!(body["message"].as_str().unwrap().contains("amount"));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn negative_amount_is_rejected() {
    let provider = Arc::new(MockRateProvider::new("test"));
    let app = app_with(provider.clone(), &ServerConfig::default());

    let (status, _) = get(app, "/fx?amount=-3").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn upstream_failure_is_bad_gateway() {
    let provider = Arc::new(MockRateProvider::new("test").failing(500, "boom"));
    let app = app_with(provider, &ServerConfig::default());

    let (status, body) = get(app, "/fx?from=usd&to=etb").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], 502);
    assert!(body["message"].as_str().unwrap().contains("500"));
}

#[tokio::test]
async fn request_deadline_is_bad_gateway() {
    let provider = Arc::new(MockRateProvider::new("slow").with_delay(Duration::from_secs(10)));
    provider.set_rate(usd_etb(), 1.0);
    let config = ServerConfig {
        request_timeout: Duration::from_millis(50),
        ..Default::default()
    };
    let app = app_with(provider, &config);

    let (status, _) = get(app, "/fx").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn repeated_requests_hit_cache() {
    let provider = Arc::new(MockRateProvider::new("test"));
    provider.set_rate(usd_etb(), 56.0);
    let app = app_with(provider.clone(), &ServerConfig::default());

    let (first, _) = get(app.clone(), "/fx?from=usd&to=etb").await;
    let (second, _) = get(app.clone(), "/fx?from=USD&to=%27etb%27").await;
    let (_, health) = get(app, "/health").await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);
    assert_eq!(provider.calls(), 1);
    assert_eq!(health["metrics"]["cache_hits"], 1);
    assert_eq!(health["metrics"]["provider_calls"], 1);
}

#[tokio::test]
async fn health_reports_cache() {
    let provider = Arc::new(MockRateProvider::new("test"));
    let config = ServerConfig::default();
    let state = Arc::new(AppState::new(provider, Arc::new(NoCache), &config));
    let app = app_router(state, &config);

    let (status, body) = get(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["cache"], "none");
}

#[tokio::test]
async fn uncached_requests_count_only_provider_calls() {
    let provider = Arc::new(MockRateProvider::new("test"));
    provider.set_rate(usd_etb(), 1.5);
    let config = ServerConfig::default();
    let state = Arc::new(AppState::new(provider, Arc::new(NoCache), &config));
    let app = app_router(state, &config);

    let (status, _) = get(app.clone(), "/fx").await;
    let (_, health) = get(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["metrics"]["provider_calls"], 1);
    assert_eq!(health["metrics"]["cache_misses"], 0);
    assert_eq!(health["metrics"]["cache_writes"], 0);
}

#[tokio::test]
async fn metrics_are_exported_as_text() {
    let provider = Arc::new(MockRateProvider::new("test"));
    let app = app_with(provider, &ServerConfig::default());

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("fxgate_provider_calls_total 0"));
}

#[tokio::test]
async fn routes_mount_under_base_path() {
    let provider = Arc::new(MockRateProvider::new("test"));
    provider.set_rate(usd_etb(), 3.0);
    let config = ServerConfig {
        base_path: "/api/v1/".to_string(),
        ..Default::default()
    };
    let app = app_with(provider, &config);

    let (status, body) = get(app.clone(), "/api/v1/fx").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rate"], 3.0);

    let (status, _) = get(app, "/fx").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
