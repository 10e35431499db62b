//! # Card Records
//!
//! Routes:
//! - POST   /card — Store a card record
//! - GET    /cards — List card records
//! - DELETE /card/{id} — Delete a card record

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use cardvault_core::CardNumber;

use crate::db::Page;
use crate::error::AppError;
use crate::extractors::{extract_validated_json, extract_validated_query, Validate};
use crate::middleware::metrics::{record_card_created, record_card_deleted, record_validation};
use crate::state::{AppState, CardRecord, NewCard};

/// Upper bound on stored card number and owner lengths.
const MAX_FIELD_LEN: usize = 255;

/// Upper bound on the `limit` query parameter.
const MAX_PAGE_SIZE: u32 = 1000;

/// Request to store a card.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateCardRequest {
    #[schema(example = "4111111111111111")]
    pub card_number: String,
    /// Stored as given when present; computed with the checksum when omitted.
    #[serde(default)]
    pub is_valid: Option<bool>,
    #[serde(default)]
    pub owner: String,
}

impl Validate for CreateCardRequest {
    fn validate(&self) -> Result<(), String> {
        if self.card_number.is_empty() {
            return Err("card_number must not be empty".to_string());
        }
        if self.card_number.chars().count() > MAX_FIELD_LEN {
            return Err(format!(
                "card_number must not exceed {MAX_FIELD_LEN} characters"
            ));
        }
        if self.owner.chars().count() > MAX_FIELD_LEN {
            return Err(format!("owner must not exceed {MAX_FIELD_LEN} characters"));
        }
        Ok(())
    }
}

/// Pagination parameters for listing cards.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(deny_unknown_fields)]
#[into_params(parameter_in = Query)]
pub struct ListCardsQuery {
    /// Maximum number of records to return (1..=1000). All records when omitted.
    pub limit: Option<u32>,
    /// Number of records to skip.
    pub offset: Option<u32>,
}

impl Validate for ListCardsQuery {
    fn validate(&self) -> Result<(), String> {
        if let Some(limit) = self.limit {
            if limit == 0 || limit > MAX_PAGE_SIZE {
                return Err(format!("limit must be between 1 and {MAX_PAGE_SIZE}"));
            }
        }
        Ok(())
    }
}

impl From<ListCardsQuery> for Page {
    fn from(query: ListCardsQuery) -> Self {
        Page {
            limit: query.limit,
            offset: query.offset.unwrap_or(0),
        }
    }
}

/// Confirmation of a deletion.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteCardResponse {
    #[schema(example = "Card with ID 1 deleted successfully")]
    pub message: String,
}

/// Build the card records router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/card", post(create_card))
        .route("/cards", get(list_cards))
        .route("/card/{id}", delete(delete_card))
}

/// POST /card — Store a card record.
#[utoipa::path(
    post,
    path = "/card",
    request_body = CreateCardRequest,
    responses(
        (status = 201, description = "Card stored", body = CardRecord),
        (status = 422, description = "Invalid request", body = crate::error::ErrorBody),
    ),
    tag = "cards"
)]
pub async fn create_card(
    State(state): State<AppState>,
    body: Result<Json<CreateCardRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CardRecord>), AppError> {
    let req = extract_validated_json(body)?;
    let number = CardNumber::new(req.card_number);

    let is_valid = match req.is_valid {
        Some(flag) => flag,
        None => {
            let outcome = number.check();
            record_validation(&outcome);
            outcome.is_valid()
        }
    };

    let card = NewCard {
        number,
        is_valid,
        owner: req.owner,
    };

    let record = state.store.insert(&card).await.map_err(|e| {
        tracing::error!(card = %card.number.masked(), error = %e, "failed to store card");
        AppError::from(e)
    })?;

    record_card_created();
    tracing::info!(
        id = record.id,
        card = %record.number.masked(),
        is_valid = record.is_valid,
        "card stored"
    );

    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /cards — List card records.
#[utoipa::path(
    get,
    path = "/cards",
    params(ListCardsQuery),
    responses(
        (status = 200, description = "Stored cards in ascending id order", body = Vec<CardRecord>),
        (status = 422, description = "Invalid pagination", body = crate::error::ErrorBody),
    ),
    tag = "cards"
)]
pub async fn list_cards(
    State(state): State<AppState>,
    query: Result<Query<ListCardsQuery>, QueryRejection>,
) -> Result<Json<Vec<CardRecord>>, AppError> {
    let page = Page::from(extract_validated_query(query)?);
    let cards = state.store.list(page).await?;
    tracing::debug!(count = cards.len(), "cards listed");
    Ok(Json(cards))
}

/// DELETE /card/{id} — Delete a card record.
#[utoipa::path(
    delete,
    path = "/card/{id}",
    params(("id" = i64, Path, description = "Card ID")),
    responses(
        (status = 200, description = "Card deleted", body = DeleteCardResponse),
        (status = 404, description = "No card with this ID", body = crate::error::ErrorBody),
        (status = 422, description = "ID is not an integer", body = crate::error::ErrorBody),
    ),
    tag = "cards"
)]
pub async fn delete_card(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<DeleteCardResponse>, AppError> {
    let id: i64 = raw_id.parse().map_err(|e| {
        tracing::warn!(id = %raw_id, error = %e, "rejected card id");
        AppError::BadRequest(format!("invalid ID: {e}"))
    })?;

    let removed = state.store.delete(id).await.map_err(|e| {
        tracing::error!(id, error = %e, "failed to delete card");
        AppError::from(e)
    })?;

    if !removed {
        return Err(AppError::NotFound(
            "No card found with specified ID".to_string(),
        ));
    }

    record_card_deleted();
    tracing::info!(id, "card deleted");

    Ok(Json(DeleteCardResponse {
        message: format!("Card with ID {id} deleted successfully"),
    }))
}
