//! # Prometheus Metrics
//!
//! Metrics are recorded through the `metrics` facade and rendered by
//! `metrics-exporter-prometheus`. When no recorder is installed the macros
//! are no-ops, so handlers record unconditionally.
//!
//! - `cardvault_http_requests_total{method,path,status}`
//! - `cardvault_http_request_duration_seconds{method,path}`
//! - `cardvault_http_errors_total{method,path,status}` (4xx and 5xx)
//! - `cardvault_validations_total{result}`
//! - `cardvault_cards_created_total`, `cardvault_cards_deleted_total`

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use cardvault_core::CheckOutcome;
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

pub const HTTP_REQUESTS_TOTAL: &str = "cardvault_http_requests_total";
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "cardvault_http_request_duration_seconds";
pub const HTTP_ERRORS_TOTAL: &str = "cardvault_http_errors_total";
pub const VALIDATIONS_TOTAL: &str = "cardvault_validations_total";
pub const CARDS_CREATED_TOTAL: &str = "cardvault_cards_created_total";
pub const CARDS_DELETED_TOTAL: &str = "cardvault_cards_deleted_total";

const DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Prometheus exposition format content type.
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Build the Prometheus exporter configuration used by the service.
pub fn builder() -> Result<PrometheusBuilder, BuildError> {
    PrometheusBuilder::new().set_buckets_for_metric(
        Matcher::Full(HTTP_REQUEST_DURATION_SECONDS.to_string()),
        DURATION_BUCKETS,
    )
}

/// Install the global Prometheus recorder and describe the service metrics.
///
/// Must be called at most once per process.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = builder()?.install_recorder()?;
    describe();
    Ok(handle)
}

fn describe() {
    metrics::describe_counter!(HTTP_REQUESTS_TOTAL, "Total HTTP requests");
    metrics::describe_histogram!(
        HTTP_REQUEST_DURATION_SECONDS,
        metrics::Unit::Seconds,
        "HTTP request duration in seconds"
    );
    metrics::describe_counter!(HTTP_ERRORS_TOTAL, "Total HTTP errors (4xx and 5xx)");
    metrics::describe_counter!(VALIDATIONS_TOTAL, "Card number checks by result");
    metrics::describe_counter!(CARDS_CREATED_TOTAL, "Card records created");
    metrics::describe_counter!(CARDS_DELETED_TOTAL, "Card records deleted");
}

/// Record the outcome of a card number check.
pub fn record_validation(outcome: &CheckOutcome) {
    metrics::counter!(VALIDATIONS_TOTAL, "result" => outcome.as_str()).increment(1);
}

/// Record a created card.
pub fn record_card_created() {
    metrics::counter!(CARDS_CREATED_TOTAL).increment(1);
}

/// Record a deleted card.
pub fn record_card_deleted() {
    metrics::counter!(CARDS_DELETED_TOTAL).increment(1);
}

fn record_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let status_str = status.to_string();
    metrics::counter!(
        HTTP_REQUESTS_TOTAL,
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status_str.clone()
    )
    .increment(1);

    metrics::histogram!(
        HTTP_REQUEST_DURATION_SECONDS,
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_secs);

    if status >= 400 {
        metrics::counter!(
            HTTP_ERRORS_TOTAL,
            "method" => method.to_string(),
            "path" => path.to_string(),
            "status" => status_str
        )
        .increment(1);
    }
}

/// Normalize a request path by replacing numeric segments with `{id}`.
///
/// Keeps label cardinality bounded: `/card/17` and `/card/18` share a series.
fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
                "{id}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Middleware that records HTTP request metrics.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());
    let start = Instant::now();

    let response = next.run(request).await;

    record_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_recorder() -> metrics_exporter_prometheus::PrometheusRecorder {
        builder().unwrap().build_recorder()
    }

    #[test]
    fn normalize_path_replaces_numeric_ids() {
        assert_eq!(normalize_path("/card/42"), "/card/{id}");
        assert_eq!(normalize_path("/card/9000000000"), "/card/{id}");
    }

    #[test]
    fn normalize_path_preserves_non_numeric_segments() {
        assert_eq!(normalize_path("/cards"), "/cards");
        assert_eq!(normalize_path("/card/abc"), "/card/abc");
        assert_eq!(normalize_path("/card/-1"), "/card/-1");
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn requests_and_errors_are_rendered() {
        let recorder = local_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            record_request("GET", "/cards", 200, 0.01);
            record_request("DELETE", "/card/{id}", 404, 0.02);
        });

        let output = handle.render();
        assert!(output.contains(HTTP_REQUESTS_TOTAL));
        assert!(output.contains(HTTP_REQUEST_DURATION_SECONDS));
        assert!(output.contains(HTTP_ERRORS_TOTAL));
        assert!(output.contains("status=\"404\""));
    }

    #[test]
    fn successful_requests_do_not_count_as_errors() {
        let recorder = local_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            record_request("POST", "/validate", 200, 0.001);
        });

        let output = handle.render();
        assert!(output.contains(HTTP_REQUESTS_TOTAL));
        assert!(!output.contains(HTTP_ERRORS_TOTAL));
    }

    #[test]
    fn validation_outcomes_are_labeled() {
        let recorder = local_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            record_validation(&CheckOutcome::Valid);
            record_validation(&CheckOutcome::InvalidChecksum);
            record_validation(&CheckOutcome::Malformed {
                position: 0,
                found: 'x',
            });
        });

        let output = handle.render();
        assert!(output.contains("result=\"valid\""));
        assert!(output.contains("result=\"invalid_checksum\""));
        assert!(output.contains("result=\"malformed\""));
    }
}
