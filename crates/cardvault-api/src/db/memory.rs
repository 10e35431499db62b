//! In-memory card store.
//!
//! Mirrors the MySQL backend: ids start at 1 and are never reused, listing
//! is in ascending id order, and timestamps have second precision.
//!
//! All operations are synchronous. The lock is `parking_lot` and is never
//! held across an `.await`.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use parking_lot::RwLock;

use super::Page;
use crate::state::{CardRecord, NewCard};

/// Thread-safe, cloneable in-memory card table.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Table>>,
}

#[derive(Debug, Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, CardRecord>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a card, assigning the next id and the current time.
    pub fn insert(&self, card: &NewCard) -> CardRecord {
        let mut table = self.inner.write();
        table.last_id += 1;
        let record = CardRecord {
            id: table.last_id,
            number: card.number.clone(),
            is_valid: card.is_valid,
            created_at: Utc::now().trunc_subsecs(0),
            owner: card.owner.clone(),
        };
        table.rows.insert(record.id, record.clone());
        record
    }

    /// List cards in ascending id order within `page`.
    pub fn list(&self, page: Page) -> Vec<CardRecord> {
        let table = self.inner.read();
        let rows = table.rows.values().skip(page.offset as usize);
        match page.limit {
            Some(limit) => rows.take(limit as usize).cloned().collect(),
            None => rows.cloned().collect(),
        }
    }

    /// Remove a card. Returns `true` if it existed.
    pub fn delete(&self, id: i64) -> bool {
        self.inner.write().rows.remove(&id).is_some()
    }

    /// Number of stored cards.
    pub fn len(&self) -> usize {
        self.inner.read().rows.len()
    }

    /// Whether the store holds no cards.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
