use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::types::{Item, ItemKind, MatchRecord};

/// Partial update applied with merge semantics: only the fields set here
/// change, everything else on the stored item persists.
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub image_analysis: Option<String>,
    pub semantic_description: Option<String>,
    pub embedding_id: Option<String>,
    pub last_checked_at: Option<DateTime<Utc>>,
}

/// Contract with the external document store.
///
/// All calls are remote I/O from the core's perspective. `append_match` is
/// the one write the matching core depends on for correctness: it must
/// append the record iff the item's match list does not already name the
/// same opposite item, and the check plus append must be atomic per item so
/// concurrent runs cannot lose each other's appends.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Read an item, `None` if it does not exist.
    async fn read(&self, kind: ItemKind, id: &str) -> Result<Option<Item>, StoreError>;

    /// Merge `patch` into the stored item. Fails with
    /// [`StoreError::NotFound`] when the item does not exist.
    async fn update(&self, kind: ItemKind, id: &str, patch: ItemPatch) -> Result<(), StoreError>;

    /// Atomic keyed list-union: append `record` to the item's match list
    /// unless a record with the same opposite-item id is already present.
    /// Returns `true` when the record was newly appended, `false` when the
    /// append was a duplicate no-op. Existing records are never overwritten.
    async fn append_match(
        &self,
        kind: ItemKind,
        id: &str,
        record: MatchRecord,
    ) -> Result<bool, StoreError>;
}

/// In-memory store backed by a `RwLock`ed map, for tests and local runs.
pub struct InMemoryStore {
    items: RwLock<HashMap<(ItemKind, String), Item>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
        }
    }

    /// Seed or replace a full item record. Not part of [`ItemStore`]: item
    /// creation belongs to upstream ingestion, this exists so local runs
    /// and tests can populate the store.
    pub fn insert(&self, item: Item) -> Result<(), StoreError> {
        let key = (item.kind, item.id.clone());
        self.items
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?
            .insert(key, item);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.read().map(|m| m.len()).unwrap_or(0)
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

#[async_trait]
impl ItemStore for InMemoryStore {
    async fn read(&self, kind: ItemKind, id: &str) -> Result<Option<Item>, StoreError> {
        let guard = self
            .items
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        Ok(guard.get(&(kind, id.to_string())).cloned())
    }

    async fn update(&self, kind: ItemKind, id: &str, patch: ItemPatch) -> Result<(), StoreError> {
        let mut guard = self
            .items
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        let item = guard
            .get_mut(&(kind, id.to_string()))
            .ok_or_else(|| StoreError::not_found(kind, id))?;

        if let Some(analysis) = patch.image_analysis {
            item.image_analysis = Some(analysis);
        }
        if let Some(semantic) = patch.semantic_description {
            item.semantic_description = Some(semantic);
        }
        if let Some(embedding_id) = patch.embedding_id {
            item.embedding_id = Some(embedding_id);
        }
        if let Some(checked_at) = patch.last_checked_at {
            item.last_checked_at = Some(checked_at);
        }
        Ok(())
    }

    async fn append_match(
        &self,
        kind: ItemKind,
        id: &str,
        record: MatchRecord,
    ) -> Result<bool, StoreError> {
        // The write lock spans the duplicate check and the append, which is
        // what makes the union atomic for this backend.
        let mut guard = self
            .items
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        let item = guard
            .get_mut(&(kind, id.to_string()))
            .ok_or_else(|| StoreError::not_found(kind, id))?;

        if item.has_match(&record.item_id) {
            tracing::debug!(
                kind = %kind,
                item_id = %id,
                opposite_id = %record.item_id,
                "match already recorded, skipping append"
            );
            return Ok(false);
        }

        item.matches.push(record);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MatchStatus;

    fn record(opposite_id: &str, score: f32) -> MatchRecord {
        MatchRecord {
            item_id: opposite_id.into(),
            user_id: "user-b".into(),
            score,
            kind: ItemKind::Found,
            status: MatchStatus::Pending,
            created_at: Utc::now(),
            category: "wallet".into(),
        }
    }

    #[tokio::test]
    async fn read_missing_item_is_none() {
        let store = InMemoryStore::new();
        let got = store.read(ItemKind::Lost, "nope").await.expect("read");
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn update_merges_only_set_fields() {
        let store = InMemoryStore::new();
        let mut item = Item::new("lost-1", ItemKind::Lost);
        item.category = "wallet".into();
        store.insert(item).expect("insert");

        store
            .update(
                ItemKind::Lost,
                "lost-1",
                ItemPatch {
                    embedding_id: Some("lost_lost-1".into()),
                    ..ItemPatch::default()
                },
            )
            .await
            .expect("update");

        let item = store
            .read(ItemKind::Lost, "lost-1")
            .await
            .expect("read")
            .expect("exists");
        assert_eq!(item.embedding_id.as_deref(), Some("lost_lost-1"));
        // Untouched fields persist.
        assert_eq!(item.category, "wallet");
        assert!(item.semantic_description.is_none());
    }

    #[tokio::test]
    async fn update_missing_item_is_not_found() {
        let store = InMemoryStore::new();
        let err = store
            .update(ItemKind::Found, "ghost", ItemPatch::default())
            .await
            .expect_err("should fail");
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn append_match_is_idempotent_per_opposite_id() {
        let store = InMemoryStore::new();
        store
            .insert(Item::new("lost-1", ItemKind::Lost))
            .expect("insert");

        let first = store
            .append_match(ItemKind::Lost, "lost-1", record("found-1", 0.8))
            .await
            .expect("append");
        assert!(first);

        // Second append for the same opposite id is a no-op and must not
        // overwrite the original score.
        let second = store
            .append_match(ItemKind::Lost, "lost-1", record("found-1", 0.99))
            .await
            .expect("append");
        assert!(!second);

        let item = store
            .read(ItemKind::Lost, "lost-1")
            .await
            .expect("read")
            .expect("exists");
        assert_eq!(item.matches.len(), 1);
        assert!((item.matches[0].score - 0.8).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn append_match_allows_distinct_opposite_ids() {
        let store = InMemoryStore::new();
        store
            .insert(Item::new("lost-1", ItemKind::Lost))
            .expect("insert");

        assert!(store
            .append_match(ItemKind::Lost, "lost-1", record("found-1", 0.8))
            .await
            .expect("append"));
        assert!(store
            .append_match(ItemKind::Lost, "lost-1", record("found-2", 0.9))
            .await
            .expect("append"));

        let item = store
            .read(ItemKind::Lost, "lost-1")
            .await
            .expect("read")
            .expect("exists");
        assert_eq!(item.matches.len(), 2);
    }
}
