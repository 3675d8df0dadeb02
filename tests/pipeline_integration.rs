//! End-to-end scenarios driving the match engine through the in-memory
//! store with canned index results.

use std::sync::Arc;

use async_trait::async_trait;

use refind::{
    Coordinates, InMemoryStore, IndexError, Item, ItemKind, ItemStore, MatchConfig, MatchEngine,
    Neighbor, RetrieverConfig, StubEmbedder, TaxonomyConfig, VectorIndex,
};

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

fn neighbor(id: &str, score: f32) -> Neighbor {
    Neighbor {
        id: id.into(),
        score,
    }
}

fn report(id: &str, kind: ItemKind, category: &str) -> Item {
    let mut item = Item::new(id, kind);
    item.user_id = Some(format!("owner-{id}"));
    item.category = category.into();
    item.semantic_description = Some(format!("{category} report"));
    item
}

#[tokio::test]
async fn exact_category_with_nearby_coordinates_is_accepted() {
    let store = Arc::new(InMemoryStore::new());
    let mut source = report("lost-w", ItemKind::Lost, "wallet");
    source.coordinates = Some(Coordinates {
        lat: 12.9716,
        lng: 77.5946,
    });
    let mut target = report("found-w", ItemKind::Found, "wallet");
    // Roughly 50 m apart.
    target.coordinates = Some(Coordinates {
        lat: 12.97205,
        lng: 77.5946,
    });
    store.insert(source.clone()).expect("insert");
    store.insert(target).expect("insert");

    let engine = engine(store.clone(), vec![neighbor("found_found-w", 0.82)]);
    let outcome = engine.check_item(&source, &[1.0]).await.expect("run");

    assert_eq!(outcome.accepted, 1);
    let lost = store
        .read(ItemKind::Lost, "lost-w")
        .await
        .expect("read")
        .expect("exists");
    let found = store
        .read(ItemKind::Found, "found-w")
        .await
        .expect("read")
        .expect("exists");
    assert!(lost.has_match("found-w"));
    assert!(found.has_match("lost-w"));
    assert_eq!(lost.matches[0].score, found.matches[0].score);
}

#[tokio::test]
async fn shared_image_token_bridges_mismatched_categories() {
    let store = Arc::new(InMemoryStore::new());
    let mut source = report("lost-l", ItemKind::Lost, "electronics");
    source.image_analysis = Some("Laptop computer, silver, Apple logo".into());
    let mut target = report("found-l", ItemKind::Found, "stationery");
    target.image_analysis = Some("MacBook Pro laptop, space gray".into());
    store.insert(source.clone()).expect("insert");
    store.insert(target).expect("insert");

    let engine = engine(store.clone(), vec![neighbor("found_found-l", 0.72)]);
    let outcome = engine.check_item(&source, &[1.0]).await.expect("run");

    assert_eq!(outcome.accepted, 1);
    assert!(!outcome.pairs[0].via_override);
}

#[tokio::test]
async fn override_waives_category_but_not_distance() {
    let store = Arc::new(InMemoryStore::new());
    let mut source = report("lost-o", ItemKind::Lost, "wallet");
    source.coordinates = Some(Coordinates {
        lat: 12.9716,
        lng: 77.5946,
    });
    let mut target = report("found-o", ItemKind::Found, "bottle");
    // Roughly 5 km apart: the override lets the category mismatch through,
    // the geo gate still rejects.
    target.coordinates = Some(Coordinates {
        lat: 13.0166,
        lng: 77.5946,
    });
    store.insert(source.clone()).expect("insert");
    store.insert(target).expect("insert");

    let engine = engine(store.clone(), vec![neighbor("found_found-o", 0.95)]);
    let outcome = engine.check_item(&source, &[1.0]).await.expect("run");

    assert_eq!(outcome.accepted, 0);
    let lost = store
        .read(ItemKind::Lost, "lost-o")
        .await
        .expect("read")
        .expect("exists");
    assert!(lost.matches.is_empty());
}

#[tokio::test]
async fn override_without_distance_constraint_is_accepted() {
    let store = Arc::new(InMemoryStore::new());
    let source = report("lost-o2", ItemKind::Lost, "wallet");
    let target = report("found-o2", ItemKind::Found, "bottle");
    store.insert(source.clone()).expect("insert");
    store.insert(target).expect("insert");

    let engine = engine(store.clone(), vec![neighbor("found_found-o2", 0.95)]);
    let outcome = engine.check_item(&source, &[1.0]).await.expect("run");

    assert_eq!(outcome.accepted, 1);
    assert!(outcome.pairs[0].via_override);
}

#[tokio::test]
async fn recheck_skips_candidates_already_in_the_ledger() {
    let store = Arc::new(InMemoryStore::new());
    let source = report("lost-r", ItemKind::Lost, "wallet");
    let target = report("found-r", ItemKind::Found, "wallet");
    store.insert(source.clone()).expect("insert");
    store.insert(target).expect("insert");

    let engine = engine(store.clone(), vec![neighbor("found_found-r", 0.82)]);

    // First pass records the pair, second pass finds nothing new.
    let first = engine.recheck(ItemKind::Lost, "lost-r").await.expect("recheck");
    assert_eq!(first, 1);
    let second = engine.recheck(ItemKind::Lost, "lost-r").await.expect("recheck");
    assert_eq!(second, 0);

    let lost = store
        .read(ItemKind::Lost, "lost-r")
        .await
        .expect("read")
        .expect("exists");
    assert_eq!(lost.matches.len(), 1);
    assert!(lost.last_checked_at.is_some());
}

#[tokio::test]
async fn score_exactly_at_threshold_is_accepted() {
    let store = Arc::new(InMemoryStore::new());
    let source = report("lost-t", ItemKind::Lost, "wallet");
    let target = report("found-t", ItemKind::Found, "wallet");
    store.insert(source.clone()).expect("insert");
    store.insert(target).expect("insert");

    let engine = engine(store.clone(), vec![neighbor("found_found-t", 0.70)]);
    let outcome = engine.check_item(&source, &[1.0]).await.expect("run");

    assert_eq!(outcome.accepted, 1);
}

#[tokio::test]
async fn scores_just_below_threshold_are_dropped() {
    let store = Arc::new(InMemoryStore::new());
    let source = report("lost-b", ItemKind::Lost, "wallet");
    let target = report("found-b", ItemKind::Found, "wallet");
    store.insert(source.clone()).expect("insert");
    store.insert(target).expect("insert");

    let engine = engine(store.clone(), vec![neighbor("found_found-b", 0.699)]);
    let outcome = engine.check_item(&source, &[1.0]).await.expect("run");

    assert_eq!(outcome.accepted, 0);
}

#[tokio::test]
async fn mixed_candidate_list_accepts_only_qualifying_pairs() {
    let store = Arc::new(InMemoryStore::new());
    let source = report("lost-m", ItemKind::Lost, "wallet");
    store.insert(source.clone()).expect("insert");
    store
        .insert(report("found-m1", ItemKind::Found, "wallet"))
        .expect("insert");
    store
        .insert(report("found-m2", ItemKind::Found, "bottle"))
        .expect("insert");
    store
        .insert(report("found-m3", ItemKind::Found, "purse"))
        .expect("insert");

    let engine = engine(
        store.clone(),
        vec![
            // The source's own vector, suppressed as a self match.
            neighbor("lost_lost-m", 0.99999),
            neighbor("found_found-m1", 0.90),
            // Incompatible and below the override threshold.
            neighbor("found_found-m2", 0.75),
            // Same category group (personal_items).
            neighbor("found_found-m3", 0.71),
            // Below the score threshold entirely.
            neighbor("found_found-m1", 0.20),
        ],
    );
    let outcome = engine.check_item(&source, &[1.0]).await.expect("run");

    assert_eq!(outcome.accepted, 2);
    let lost = store
        .read(ItemKind::Lost, "lost-m")
        .await
        .expect("read")
        .expect("exists");
    assert!(lost.has_match("found-m1"));
    assert!(lost.has_match("found-m3"));
    assert!(!lost.has_match("found-m2"));
}
