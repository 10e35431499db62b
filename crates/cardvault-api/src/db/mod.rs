//! # Record Store
//!
//! Translates card CRUD intents into storage operations.
//!
//! ## Backends
//!
//! - **MySQL** when a database URL is configured. Statements live in
//!   [`cards`] and are always parameterized.
//! - **Memory** otherwise, for development and tests. Records do not survive
//!   a restart.
//!
//! The schema is not managed here; `sql/credit_cards.sql` holds the table
//! definition the MySQL backend expects.

pub mod cards;
pub mod memory;

use std::time::Duration;

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use thiserror::Error;

use crate::config::DatabaseConfig;
use crate::state::{CardRecord, NewCard};

pub use memory::MemoryStore;

/// Errors raised by the record store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The database rejected a statement or could not be reached.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An inserted row could not be read back.
    #[error("card {0} vanished after insert")]
    MissingAfterInsert(i64),
}

/// Pagination window for listing cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    /// Maximum number of records; `None` returns everything.
    pub limit: Option<u32>,
    /// Number of records to skip.
    pub offset: u32,
}

/// Handle to the card record store.
///
/// Cheap to clone: both variants share their underlying pool or map.
#[derive(Debug, Clone)]
pub enum CardStore {
    /// MySQL connection pool.
    MySql(MySqlPool),
    /// In-process map.
    Memory(MemoryStore),
}

impl CardStore {
    /// Open a MySQL pool with the configured bounds.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await?;

        tracing::info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Connected to MySQL"
        );
        Ok(Self::MySql(pool))
    }

    /// Open the MySQL store when configured, otherwise fall back to memory.
    pub async fn from_config(config: Option<&DatabaseConfig>) -> Result<Self, StoreError> {
        match config {
            Some(db) => Self::connect(db).await,
            None => {
                tracing::warn!(
                    "DATABASE_URL not set; running with the in-memory store. \
                     Cards will not survive restarts."
                );
                Ok(Self::memory())
            }
        }
    }

    /// A fresh, empty in-memory store.
    pub fn memory() -> Self {
        Self::Memory(MemoryStore::new())
    }

    /// Backend name for logs and diagnostics.
    pub fn backend(&self) -> &'static str {
        match self {
            Self::MySql(_) => "mysql",
            Self::Memory(_) => "memory",
        }
    }

    /// Insert a card and return the stored record.
    pub async fn insert(&self, card: &NewCard) -> Result<CardRecord, StoreError> {
        match self {
            Self::MySql(pool) => cards::insert(pool, card).await,
            Self::Memory(store) => Ok(store.insert(card)),
        }
    }

    /// List cards in ascending id order.
    pub async fn list(&self, page: Page) -> Result<Vec<CardRecord>, StoreError> {
        match self {
            Self::MySql(pool) => cards::list(pool, page).await,
            Self::Memory(store) => Ok(store.list(page)),
        }
    }

    /// Delete a card. Returns `true` if a record was removed.
    pub async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        match self {
            Self::MySql(pool) => cards::delete(pool, id).await,
            Self::Memory(store) => Ok(store.delete(id)),
        }
    }

    /// Check that the backend can serve queries.
    pub async fn ping(&self) -> Result<(), StoreError> {
        match self {
            Self::MySql(pool) => cards::ping(pool).await,
            Self::Memory(_) => Ok(()),
        }
    }

    /// Release backend resources. Waits for checked-out connections to return.
    pub async fn close(&self) {
        match self {
            Self::MySql(pool) => {
                pool.close().await;
                tracing::info!("MySQL pool closed");
            }
            Self::Memory(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardvault_core::CardNumber;

    fn new_card(number: &str, owner: &str) -> NewCard {
        let number = CardNumber::new(number);
        NewCard {
            is_valid: number.is_valid(),
            number,
            owner: owner.to_string(),
        }
    }

    #[tokio::test]
    async fn from_config_without_database_uses_memory() {
        let store = CardStore::from_config(None).await.unwrap();
        assert_eq!(store.backend(), "memory");
        store.ping().await.unwrap();
    }

    #[tokio::test]
    async fn clones_share_records() {
        let store = CardStore::memory();
        let clone = store.clone();
        let record = store
            .insert(&new_card("4111111111111111", "Ada"))
            .await
            .unwrap();

        let listed = clone.list(Page::default()).await.unwrap();
        assert_eq!(listed, vec![record]);
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_was_removed() {
        let store = CardStore::memory();
        let record = store
            .insert(&new_card("4111111111111111", "Ada"))
            .await
            .unwrap();

        assert!(store.delete(record.id).await.unwrap());
        assert!(!store.delete(record.id).await.unwrap());
        assert!(store.list(Page::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn close_on_memory_store_is_a_no_op() {
        let store = CardStore::memory();
        store.close().await;
        store.ping().await.unwrap();
    }
}
