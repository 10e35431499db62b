//! Card persistence operations.
//!
//! All functions take a `&MySqlPool` and operate on the `credit_cards` table.

use chrono::{DateTime, Utc};
use sqlx::MySqlPool;

use cardvault_core::CardNumber;

use super::{Page, StoreError};
use crate::state::{CardRecord, NewCard};

/// Insert a new card and read it back to pick up `id` and `created_at`.
pub async fn insert(pool: &MySqlPool, card: &NewCard) -> Result<CardRecord, StoreError> {
    let result =
        sqlx::query("INSERT INTO credit_cards (card_number, is_valid, owner) VALUES (?, ?, ?)")
            .bind(card.number.as_str())
            .bind(card.is_valid)
            .bind(&card.owner)
            .execute(pool)
            .await?;

    // AUTO_INCREMENT ids are positive and fit in a signed BIGINT.
    let id = result.last_insert_id() as i64;

    let row = sqlx::query_as::<_, CardRow>(
        "SELECT id, card_number, is_valid, owner, created_at
         FROM credit_cards WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(CardRow::into_record)
        .ok_or(StoreError::MissingAfterInsert(id))
}

/// List cards in ascending id order.
pub async fn list(pool: &MySqlPool, page: Page) -> Result<Vec<CardRecord>, StoreError> {
    // MySQL has no OFFSET without LIMIT; the largest BIGINT UNSIGNED means "all".
    let limit = page.limit.map(u64::from).unwrap_or(u64::MAX);

    let rows = sqlx::query_as::<_, CardRow>(
        "SELECT id, card_number, is_valid, owner, created_at
         FROM credit_cards ORDER BY id LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(u64::from(page.offset))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(CardRow::into_record).collect())
}

/// Delete a card by id. Returns `true` if a row was removed.
pub async fn delete(pool: &MySqlPool, id: i64) -> Result<bool, StoreError> {
    let result = sqlx::query("DELETE FROM credit_cards WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Round-trip a trivial statement.
pub async fn ping(pool: &MySqlPool) -> Result<(), StoreError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct CardRow {
    id: i64,
    card_number: String,
    is_valid: bool,
    owner: String,
    created_at: DateTime<Utc>,
}

impl CardRow {
    fn into_record(self) -> CardRecord {
        CardRecord {
            id: self.id,
            number: CardNumber::new(self.card_number),
            is_valid: self.is_valid,
            created_at: self.created_at,
            owner: self.owner,
        }
    }
}
