//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "CardVault API",
        version = "0.1.0",
        description = "Card number validation (Luhn checksum) and card record storage.",
        license(name = "AGPL-3.0-or-later")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        crate::routes::validate::validate_card,
        crate::routes::cards::create_card,
        crate::routes::cards::list_cards,
        crate::routes::cards::delete_card,
    ),
    components(schemas(
        crate::routes::validate::ValidateRequest,
        crate::routes::validate::ValidateResponse,
        crate::routes::cards::CreateCardRequest,
        crate::routes::cards::DeleteCardResponse,
        crate::state::CardRecord,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "validation", description = "Card number checksum"),
        (name = "cards", description = "Card record storage"),
    )
)]
pub struct ApiDoc;

/// Router serving the OpenAPI document.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
