use serde::{Deserialize, Serialize};

use item::ItemKind;

use crate::error::IndexError;
use crate::{strip_kind_prefix, VectorIndex};

/// Configuration for candidate retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieverConfig {
    /// Neighbors requested from the index per query.
    #[serde(default = "RetrieverConfig::default_top_k")]
    pub top_k: usize,

    /// Raw scores at or above this value are treated as the query item's
    /// own (duplicate-indexed) vector and dropped.
    #[serde(default = "RetrieverConfig::default_self_score_cutoff")]
    pub self_score_cutoff: f32,
}

impl RetrieverConfig {
    pub(crate) fn default_top_k() -> usize {
        10
    }

    pub(crate) fn default_self_score_cutoff() -> f32 {
        0.9999
    }

    pub fn validate(&self) -> Result<(), IndexError> {
        if self.top_k == 0 {
            return Err(IndexError::Backend(
                "retriever top_k must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            top_k: Self::default_top_k(),
            self_score_cutoff: Self::default_self_score_cutoff(),
        }
    }
}

/// An opposite-kind item surfaced by similarity search. Ephemeral: never
/// persisted, only fed to the decision pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Bare item id, prefix already stripped.
    pub item_id: String,
    pub score: f32,
}

/// Query the index and reduce raw neighbors to candidates of the requested
/// kind.
///
/// Keeps only entries whose id carries the `"{kind}_"` prefix, strips the
/// prefix, and drops near-identical scores (the index holds both kinds, so
/// the query item's own vector comes back with score ≈ 1). The index's
/// descending order is preserved.
pub async fn find_candidates(
    index: &dyn VectorIndex,
    vector: &[f32],
    target_kind: ItemKind,
    cfg: &RetrieverConfig,
) -> Result<Vec<Candidate>, IndexError> {
    let neighbors = index.query(vector, cfg.top_k).await?;
    let raw_count = neighbors.len();

    let candidates: Vec<Candidate> = neighbors
        .into_iter()
        .filter(|n| n.score < cfg.self_score_cutoff)
        .filter_map(|n| {
            strip_kind_prefix(&n.id, target_kind).map(|bare| Candidate {
                item_id: bare.to_string(),
                score: n.score,
            })
        })
        .collect();

    tracing::debug!(
        target_kind = %target_kind,
        raw = raw_count,
        kept = candidates.len(),
        "retrieved match candidates"
    );
    Ok(candidates)
}
