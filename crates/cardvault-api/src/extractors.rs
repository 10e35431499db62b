//! # Request Binding & Validation
//!
//! Request bodies and query strings decode into explicit structs marked
//! `#[serde(deny_unknown_fields)]`; a decoding failure becomes
//! [`AppError::BadRequest`]. Field rules that serde cannot express live in a
//! [`Validate`] impl and fail as [`AppError::Validation`].

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::Json;

use crate::error::AppError;

/// Field rules checked after a request has been decoded.
pub trait Validate {
    /// Validate business rules. Returns an error message on failure.
    fn validate(&self) -> Result<(), String>;
}

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
///
/// Handlers take the body as `Result<Json<T>, JsonRejection>` so the
/// rejection is reported in the service's own error format:
/// ```ignore
/// async fn handler(body: Result<Json<T>, JsonRejection>) -> Result<..., AppError> {
///     let req = extract_json(body)?;
/// }
/// ```
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body and validate it using the [`Validate`] trait.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}

/// Extract and validate a query string.
pub fn extract_validated_query<T: Validate>(
    result: Result<Query<T>, QueryRejection>,
) -> Result<T, AppError> {
    let value = result
        .map(|Query(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}
