//! Nearest-neighbor index contract and candidate retrieval.
//!
//! The index itself (ANN maintenance, persistence) is an external
//! collaborator. This crate owns the wire contract with it: entries are
//! keyed `"{kind}_{itemId}"` and a query returns neighbors across both
//! kinds. [`find_candidates`] turns raw neighbors into clean, kind-filtered
//! match candidates. [`InMemoryIndex`] is the brute-force reference
//! implementation for tests and local runs.

pub mod error;
pub mod memory;
pub mod retrieve;

use async_trait::async_trait;

use item::ItemKind;

pub use error::IndexError;
pub use memory::InMemoryIndex;
pub use retrieve::{find_candidates, Candidate, RetrieverConfig};

/// One raw query result from the index: a kind-prefixed entry id and its
/// similarity score.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub id: String,
    pub score: f32,
}

/// Contract with the external vector index.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Insert or replace the vector stored under `id`.
    async fn upsert(&self, id: &str, vector: &[f32]) -> Result<(), IndexError>;

    /// Return up to `top_k` nearest entries across both kinds, ordered by
    /// descending score.
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<Neighbor>, IndexError>;
}

/// Wire encoding of an index entry id.
pub fn vector_id(kind: ItemKind, item_id: &str) -> String {
    format!("{kind}_{item_id}")
}

/// Strip the `"{kind}_"` prefix, `None` when the id belongs to the other
/// kind (or is malformed).
pub fn strip_kind_prefix(id: &str, kind: ItemKind) -> Option<&str> {
    id.strip_prefix(kind.as_str())?.strip_prefix('_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_id_round_trips() {
        let id = vector_id(ItemKind::Lost, "item-42");
        assert_eq!(id, "lost_item-42");
        assert_eq!(strip_kind_prefix(&id, ItemKind::Lost), Some("item-42"));
        assert_eq!(strip_kind_prefix(&id, ItemKind::Found), None);
    }

    #[test]
    fn malformed_ids_do_not_decode() {
        assert_eq!(strip_kind_prefix("lost", ItemKind::Lost), None);
        assert_eq!(strip_kind_prefix("lostitem-1", ItemKind::Lost), None);
    }

    #[test]
    fn item_ids_containing_underscores_survive() {
        let id = vector_id(ItemKind::Found, "a_b_c");
        assert_eq!(strip_kind_prefix(&id, ItemKind::Found), Some("a_b_c"));
    }
}
