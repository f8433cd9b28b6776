//! In-memory [`RecordStore`] implementation for tests and embedding.
//!
//! Records live in a `Vec` behind a `std::sync::RwLock`, in insertion
//! order. Identifier and timestamp assignment happen under the write lock,
//! so concurrent `add` calls never produce out-of-order `createdAt` values.

use std::cmp::Ordering;
use std::sync::{PoisonError, RwLock};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::{IngestedRecord, NewRecord};

use super::{Direction, OrderBy, RecordField, RecordStore};

/// In-memory record store.
pub struct InMemoryStore {
    records: RwLock<Vec<IngestedRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn compare(a: &IngestedRecord, b: &IngestedRecord, field: RecordField) -> Ordering {
    match field {
        RecordField::CreatedAt => a.created_at.cmp(&b.created_at),
        RecordField::Source => a.source.cmp(&b.source),
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn add(&self, record: NewRecord) -> Result<String> {
        let mut records = self
            .records
            .write()
            .map_err(|_| anyhow!("record store lock poisoned"))?;

        let now = Utc::now();
        let created_at = match records.last() {
            Some(last) if last.created_at > now => last.created_at,
            _ => now,
        };

        let id = Uuid::new_v4().to_string();
        records.push(IngestedRecord {
            id: id.clone(),
            source: record.source,
            data: record.data,
            created_at,
        });
        Ok(id)
    }

    async fn list_all(&self, order: OrderBy) -> Result<Vec<IngestedRecord>> {
        let records = self
            .records
            .read()
            .map_err(|_| anyhow!("record store lock poisoned"))?;

        // Stable sort keeps insertion order among ties.
        let mut out = records.clone();
        out.sort_by(|a, b| compare(a, b, order.field));
        if order.direction == Direction::Desc {
            out.reverse();
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_add_assigns_unique_ids() {
        let store = InMemoryStore::new();
        let a = store.add(NewRecord::new("text", "a")).await.unwrap();
        let b = store.add(NewRecord::new("text", "b")).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_len_survives_poisoned_lock() {
        let store = InMemoryStore::new();
        store.add(NewRecord::new("text", "kept")).await.unwrap();

        let poisoned = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = store.records.write().unwrap();
            panic!("writer panicked");
        }));
        assert!(poisoned.is_err());
        assert!(store.records.is_poisoned());

        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
    }

    #[tokio::test]
    async fn test_empty_store_lists_nothing() {
        let store = InMemoryStore::new();
        assert!(store.is_empty());
        let records = store.list_all(OrderBy::NEWEST_FIRST).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_newest_first_ordering() {
        let store = InMemoryStore::new();
        let first = store.add(NewRecord::new("text", "first")).await.unwrap();
        let second = store.add(NewRecord::new("text", "second")).await.unwrap();
        let third = store.add(NewRecord::new("pdf", "dGhpcmQ=")).await.unwrap();

        let records = store.list_all(OrderBy::NEWEST_FIRST).await.unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec![third.as_str(), second.as_str(), first.as_str()]);

        for pair in records.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    #[tokio::test]
    async fn test_oldest_first_ordering() {
        let store = InMemoryStore::new();
        let first = store.add(NewRecord::new("text", "first")).await.unwrap();
        let second = store.add(NewRecord::new("text", "second")).await.unwrap();

        let records = store
            .list_all(OrderBy::new(RecordField::CreatedAt, Direction::Asc))
            .await
            .unwrap();
        assert_eq!(records[0].id, first);
        assert_eq!(records[1].id, second);
    }

    #[tokio::test]
    async fn test_order_by_source() {
        let store = InMemoryStore::new();
        store.add(NewRecord::new("text", "1")).await.unwrap();
        store.add(NewRecord::new("pdf", "2")).await.unwrap();
        store.add(NewRecord::new("audio", "3")).await.unwrap();

        let records = store
            .list_all(OrderBy::new(RecordField::Source, Direction::Asc))
            .await
            .unwrap();
        let sources: Vec<&str> = records.iter().map(|r| r.source.as_str()).collect();
        assert_eq!(sources, vec!["audio", "pdf", "text"]);
    }

    #[tokio::test]
    async fn test_fields_are_stored_unchanged() {
        let store = InMemoryStore::new();
        let id = store.add(NewRecord::new("text", " hello ")).await.unwrap();

        let records = store.list_all(OrderBy::NEWEST_FIRST).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, id);
        assert_eq!(records[0].source, "text");
        assert_eq!(records[0].data, " hello ");
    }

    #[tokio::test]
    async fn test_concurrent_adds_keep_created_at_monotonic() {
        let store = Arc::new(InMemoryStore::new());
        let mut handles = Vec::new();
        for i in 0..32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .add(NewRecord::new("text", format!("item {}", i)))
                    .await
                    .unwrap()
            }));
        }
        let mut ids = HashSet::new();
        for h in handles {
            ids.insert(h.await.unwrap());
        }
        assert_eq!(ids.len(), 32);

        let oldest_first = store
            .list_all(OrderBy::new(RecordField::CreatedAt, Direction::Asc))
            .await
            .unwrap();
        assert_eq!(oldest_first.len(), 32);
        for pair in oldest_first.windows(2) {
            assert!(pair[0].created_at <= pair[1].created_at);
        }
    }
}
