use chrono::Utc;

use item::{ItemKind, ItemPatch};

use crate::pipeline::MatchEngine;
use crate::types::MatchError;

impl MatchEngine {
    /// Re-run the pipeline for an already-ingested item on demand.
    ///
    /// The embedding input is rebuilt from stored fields with the same
    /// template ingestion used, so the fresh query vector describes the
    /// item exactly as it was indexed. Results merge into the existing
    /// ledger: entries already present are untouched and only the count of
    /// newly added matches is returned.
    pub async fn recheck(&self, kind: ItemKind, id: &str) -> Result<usize, MatchError> {
        if id.trim().is_empty() {
            return Err(MatchError::InvalidInput("item id must not be empty".into()));
        }

        let item = self
            .store
            .read(kind, id)
            .await?
            .ok_or_else(|| MatchError::NotFound {
                kind,
                id: id.to_string(),
            })?;

        if item
            .semantic_description
            .as_deref()
            .map_or(true, |d| d.trim().is_empty())
        {
            return Err(MatchError::PreconditionFailed(
                "item has not completed initial processing (no semantic description)".into(),
            ));
        }

        let embedding = self.embedder.embed(&item.embedding_input()).await?;
        let outcome = self.check_item(&item, &embedding).await?;

        self.store
            .update(
                kind,
                id,
                ItemPatch {
                    last_checked_at: Some(Utc::now()),
                    ..ItemPatch::default()
                },
            )
            .await?;

        tracing::info!(
            kind = %kind,
            item_id = %id,
            newly_accepted = outcome.accepted,
            "recheck complete"
        );
        Ok(outcome.accepted)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use classify::TaxonomyConfig;
    use embed::StubEmbedder;
    use index::{IndexError, Neighbor, RetrieverConfig, VectorIndex};
    use item::{InMemoryStore, Item, ItemStore, MatchRecord, MatchStatus};

    use super::*;
    use crate::types::MatchConfig;

    /// Index stub returning a canned neighbor list for any query.
    struct FixedIndex {
        neighbors: Vec<Neighbor>,
    }

    #[async_trait]
    impl VectorIndex for FixedIndex {
        async fn upsert(&self, _id: &str, _vector: &[f32]) -> Result<(), IndexError> {
            Ok(())
        }

        async fn query(&self, _vector: &[f32], top_k: usize) -> Result<Vec<Neighbor>, IndexError> {
            let mut neighbors = self.neighbors.clone();
            neighbors.truncate(top_k);
            Ok(neighbors)
        }
    }

    fn engine(store: Arc<InMemoryStore>, neighbors: Vec<Neighbor>) -> MatchEngine {
        MatchEngine::new(
            store,
            Arc::new(FixedIndex { neighbors }),
            Arc::new(StubEmbedder::default()),
            Arc::new(TaxonomyConfig::default()),
            MatchConfig::default(),
            RetrieverConfig::default(),
        )
        .expect("engine")
    }

    fn processed_item(id: &str, kind: ItemKind, category: &str) -> Item {
        let mut item = Item::new(id, kind);
        item.user_id = Some(format!("owner-{id}"));
        item.category = category.into();
        item.semantic_description = Some(format!("{category} - described"));
        item.embedding_id = Some(format!("{kind}_{id}"));
        item
    }

    #[tokio::test]
    async fn recheck_requires_initial_processing() {
        let store = Arc::new(InMemoryStore::new());
        let mut item = Item::new("lost-1", ItemKind::Lost);
        item.user_id = Some("owner".into());
        store.insert(item).expect("insert");

        let engine = engine(store, Vec::new());
        let err = engine
            .recheck(ItemKind::Lost, "lost-1")
            .await
            .expect_err("should fail");
        assert!(matches!(err, MatchError::PreconditionFailed(_)));
    }

    #[tokio::test]
    async fn recheck_missing_item_is_not_found() {
        let engine = engine(Arc::new(InMemoryStore::new()), Vec::new());
        let err = engine
            .recheck(ItemKind::Found, "ghost")
            .await
            .expect_err("should fail");
        assert!(matches!(err, MatchError::NotFound { .. }));
    }

    #[tokio::test]
    async fn recheck_blank_id_is_invalid_input() {
        let engine = engine(Arc::new(InMemoryStore::new()), Vec::new());
        let err = engine
            .recheck(ItemKind::Found, "  ")
            .await
            .expect_err("should fail");
        assert!(matches!(err, MatchError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn recheck_adds_new_matches_and_stamps_timestamp() {
        let store = Arc::new(InMemoryStore::new());
        store
            .insert(processed_item("lost-1", ItemKind::Lost, "wallet"))
            .expect("insert");
        store
            .insert(processed_item("found-1", ItemKind::Found, "wallet"))
            .expect("insert");

        let engine = engine(
            store.clone(),
            vec![Neighbor {
                id: "found_found-1".into(),
                score: 0.82,
            }],
        );

        let added = engine.recheck(ItemKind::Lost, "lost-1").await.expect("recheck");
        assert_eq!(added, 1);

        let item = store
            .read(ItemKind::Lost, "lost-1")
            .await
            .expect("read")
            .expect("exists");
        assert!(item.has_match("found-1"));
        assert!(item.last_checked_at.is_some());
    }

    #[tokio::test]
    async fn recheck_leaves_existing_entries_untouched() {
        let store = Arc::new(InMemoryStore::new());
        let mut source = processed_item("lost-1", ItemKind::Lost, "wallet");
        let original = MatchRecord {
            item_id: "found-1".into(),
            user_id: "owner-found-1".into(),
            score: 0.91,
            kind: ItemKind::Found,
            status: MatchStatus::Confirmed,
            created_at: Utc::now(),
            category: "wallet".into(),
        };
        source.matches.push(original.clone());
        store.insert(source).expect("insert");
        store
            .insert(processed_item("found-1", ItemKind::Found, "wallet"))
            .expect("insert");

        let engine = engine(
            store.clone(),
            vec![Neighbor {
                id: "found_found-1".into(),
                score: 0.82,
            }],
        );

        let added = engine.recheck(ItemKind::Lost, "lost-1").await.expect("recheck");
        assert_eq!(added, 0);

        let item = store
            .read(ItemKind::Lost, "lost-1")
            .await
            .expect("read")
            .expect("exists");
        assert_eq!(item.matches.len(), 1);
        // Score and status of the pre-existing record survive the rerun.
        assert_eq!(item.matches[0], original);
    }
}
