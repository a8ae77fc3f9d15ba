//! HTTP routes.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use fxgate_common::{Currency, CurrencyPair};
use fxgate_fx::{parse_amount, Conversion, MetricsSnapshot};
use serde::Serialize;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Query parameters of `GET /fx`. All optional.
#[derive(Debug, Default, PartialEq)]
pub struct FxQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub amount: Option<String>,
}

impl FxQuery {
    /// Collect known parameters; a repeated key keeps its first value.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "from" => &mut query.from,
                "to" => &mut query.to,
                "amount" => &mut query.amount,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    cache: String,
    metrics: MetricsSnapshot,
}

/// Canonical code from a query value, or `default` when absent or blank.
fn currency_or(raw: Option<&str>, default: Currency) -> Currency {
    raw.and_then(|raw| Currency::parse(raw).ok())
        .unwrap_or(default)
}

async fn get_fx(
    State(state): State<Arc<AppState>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<Json<Conversion>> {
    let Query(pairs) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let query = FxQuery::from_pairs(pairs);

    let request_id = Uuid::now_v7();
    let span = info_span!("fx_request", %request_id);

    async move {
        let pair = CurrencyPair::new(
            currency_or(query.from.as_deref(), Currency::usd()),
            currency_or(query.to.as_deref(), Currency::etb()),
        );
        let amount = parse_amount(query.amount.as_deref())?;

        let rate = state
            .resolver
            .resolve_with_deadline(&pair, state.request_timeout)
            .await?;

        let conversion = Conversion::new(pair, rate, amount);
        info!(
            from = %conversion.from,
            to = %conversion.to,
            rate,
            amount,
            "Rate resolved"
        );
        Ok::<_, ApiError>(Json(conversion))
    }
    .instrument(span)
    .await
}

async fn get_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        cache: state.resolver.cache_name().to_string(),
        metrics: state.resolver.metrics().snapshot(),
    })
}

async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.resolver.metrics().to_prometheus(),
    )
}

fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/fx", get(get_fx))
        .route("/health", get(get_health))
        .route("/metrics", get(get_metrics))
}

/// Build the service router, mounted under the configured base path.
pub fn app_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let base = config.base_path.trim_end_matches('/');
    let router = if base.is_empty() {
        routes()
    } else {
        Router::new().nest(base, routes())
    };
    router.with_state(state)
}
