//! # cardvault-api — Axum API Service for CardVault
//!
//! HTTP surface around the Luhn checksum in `cardvault-core` and a MySQL
//! table of card records.
//!
//! ## API Surface
//!
//! | Route                | Module                   | Purpose                    |
//! |----------------------|--------------------------|----------------------------|
//! | `POST /validate`     | [`routes::validate`]     | Checksum a card number     |
//! | `POST /card`         | [`routes::cards`]        | Store a card record        |
//! | `GET /cards`         | [`routes::cards`]        | List card records          |
//! | `DELETE /card/{id}`  | [`routes::cards`]        | Delete a card record       |
//! | `GET /openapi.json`  | [`openapi`]              | OpenAPI document           |
//! | `GET /health/*`      | this module              | Liveness and readiness     |
//! | `GET /metrics`       | this module              | Prometheus scrape endpoint |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → Handler
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, StatusCode};
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

pub use error::AppError;
pub use state::AppState;

/// Request bodies are a handful of short strings.
const BODY_LIMIT_BYTES: usize = 64 * 1024;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes and `/metrics` sit outside the metrics middleware so that
/// scrapes and probes do not inflate request counters.
pub fn app(state: AppState) -> Router {
    let mut api = Router::new()
        .merge(routes::validate::router())
        .merge(routes::cards::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES));

    if state.metrics_enabled() {
        api = api.layer(from_fn(middleware::metrics::metrics_middleware));
    }

    let api = api
        .layer(middleware::tracing_layer::layer())
        .with_state(state.clone());

    let mut unauthenticated = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    if state.metrics_enabled() {
        unauthenticated = unauthenticated.route("/metrics", get(prometheus_metrics));
    }

    let unauthenticated = unauthenticated.with_state(state);

    Router::new().merge(unauthenticated).merge(api)
}

/// GET /metrics — Prometheus metrics scrape endpoint.
async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(
                header::CONTENT_TYPE,
                middleware::metrics::PROMETHEUS_CONTENT_TYPE,
            )],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 when the record store answers, 503 otherwise.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    if let Err(e) = state.store.ping().await {
        tracing::warn!(backend = state.store.backend(), error = %e, "store health check failed");
        return (StatusCode::SERVICE_UNAVAILABLE, "database unreachable").into_response();
    }
    (StatusCode::OK, "ready").into_response()
}
