//! # Card Number Validation
//!
//! Routes:
//! - POST /validate — Run the Luhn checksum over a card number.
//!
//! The response is the two-valued verdict only. Malformed input and a failed
//! checksum are both `false`; the distinction appears in logs and metrics.

use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use cardvault_core::CardNumber;

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::middleware::metrics::record_validation;
use crate::state::AppState;

/// Request to validate a card number.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ValidateRequest {
    /// Card number to check. Any string is accepted; non-digits make it invalid.
    #[schema(example = "4111111111111111")]
    pub card_number: String,
}

/// Checksum verdict.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidateResponse {
    pub is_valid: bool,
}

/// Build the validation router.
pub fn router() -> Router<AppState> {
    Router::new().route("/validate", post(validate_card))
}

/// POST /validate — Validate a card number.
#[utoipa::path(
    post,
    path = "/validate",
    request_body = ValidateRequest,
    responses(
        (status = 200, description = "Checksum verdict", body = ValidateResponse),
        (status = 422, description = "Malformed request body", body = crate::error::ErrorBody),
    ),
    tag = "validation"
)]
pub async fn validate_card(
    body: Result<Json<ValidateRequest>, JsonRejection>,
) -> Result<Json<ValidateResponse>, AppError> {
    let req = extract_json(body)?;
    let number = CardNumber::new(req.card_number);
    let outcome = number.check();

    record_validation(&outcome);
    tracing::debug!(card = %number.masked(), %outcome, "card number checked");

    Ok(Json(ValidateResponse {
        is_valid: outcome.is_valid(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_app() -> Router<()> {
        router().with_state(AppState::in_memory())
    }

    async fn post_validate(body: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::builder()
            .method("POST")
            .uri("/validate")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let resp = test_app().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn valid_number_returns_true() {
        let (status, json) = post_validate(r#"{"card_number":"4111111111111111"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!({"is_valid": true}));
    }

    #[tokio::test]
    async fn invalid_number_returns_false() {
        let (status, json) = post_validate(r#"{"card_number":"1234567890123456"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["is_valid"], false);
    }

    #[tokio::test]
    async fn malformed_number_returns_false_not_error() {
        let (status, json) = post_validate(r#"{"card_number":"411111111111111a"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["is_valid"], false);
    }

    #[tokio::test]
    async fn empty_number_is_valid() {
        let (status, json) = post_validate(r#"{"card_number":""}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["is_valid"], true);
    }

    #[tokio::test]
    async fn unknown_field_returns_422() {
        let (status, json) =
            post_validate(r#"{"card_number":"4111111111111111","cvv":"123"}"#).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn missing_field_returns_422() {
        let (status, _) = post_validate(r#"{}"#).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn numeric_card_number_returns_422() {
        let (status, _) = post_validate(r#"{"card_number":4111111111111111}"#).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
