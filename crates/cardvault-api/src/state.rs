//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers via
//! the `State` extractor, plus the card record types that flow between the
//! handlers and the record store.
//!
//! The store handle is acquired once at startup and lives in [`AppState`];
//! there is no global connection.

use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use cardvault_core::CardNumber;

use crate::db::CardStore;

/// A persisted card record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CardRecord {
    /// Identifier assigned by the store.
    pub id: i64,
    /// Card number exactly as submitted.
    #[serde(rename = "card_number")]
    #[schema(value_type = String, example = "4111111111111111")]
    pub number: CardNumber,
    /// Checksum verdict recorded with the card.
    pub is_valid: bool,
    /// Creation time assigned by the store, second precision.
    pub created_at: DateTime<Utc>,
    /// Card holder.
    pub owner: String,
}

/// A card record about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCard {
    pub number: CardNumber,
    pub is_valid: bool,
    pub owner: String,
}

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// Record store handle.
    pub store: CardStore,
    /// Prometheus render handle; `None` when metrics are disabled.
    pub metrics: Option<PrometheusHandle>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store.backend())
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

impl AppState {
    /// Create state around an already-acquired store, with metrics disabled.
    pub fn new(store: CardStore) -> Self {
        Self {
            store,
            metrics: None,
        }
    }

    /// Create state backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(CardStore::memory())
    }

    /// Attach a Prometheus handle, enabling request metrics and `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Whether request metrics are recorded.
    pub fn metrics_enabled(&self) -> bool {
        self.metrics.is_some()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_with_wire_names() {
        let record = CardRecord {
            id: 3,
            number: CardNumber::new("4111111111111111"),
            is_valid: true,
            created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            owner: "Ada".to_string(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["card_number"], "4111111111111111");
        assert_eq!(json["is_valid"], true);
        assert_eq!(json["owner"], "Ada");
        assert_eq!(json["created_at"], "2023-11-14T22:13:20Z");
        assert!(json.get("number").is_none());
    }

    #[test]
    fn in_memory_state_has_metrics_disabled() {
        let state = AppState::in_memory();
        assert!(!state.metrics_enabled());
        assert_eq!(state.store.backend(), "memory");
    }
}
