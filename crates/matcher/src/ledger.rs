use std::sync::Arc;

use item::{Item, ItemStore};

use crate::types::{MatchError, MatchPair};

/// Bidirectional, append-only persistence of accepted pairs.
///
/// Every accepted pair is written to both parties' match lists through the
/// store's atomic keyed append, so a list never gains a second record for
/// the same opposite item and an existing record's score and status are
/// never overwritten. Because both writes are idempotent, re-running a
/// pipeline over already-matched candidates is safe.
pub struct Ledger {
    store: Arc<dyn ItemStore>,
}

impl Ledger {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }

    /// Commit both sides of an accepted pair.
    ///
    /// Returns `true` when the source-side record was newly appended,
    /// `false` when the pair was already in the ledger. The target-side
    /// append runs unconditionally so a pair that was half-written by an
    /// aborted run heals on retry.
    pub async fn commit_pair(&self, source: &Item, pair: &MatchPair) -> Result<bool, MatchError> {
        let newly_recorded = self
            .store
            .append_match(source.kind, &source.id, pair.source_record.clone())
            .await?;

        let mirrored = self
            .store
            .append_match(pair.target_kind, &pair.target_id, pair.target_record.clone())
            .await?;

        tracing::debug!(
            source = %source.id,
            target = %pair.target_id,
            score = pair.score,
            newly_recorded,
            mirrored,
            "committed match pair"
        );
        Ok(newly_recorded)
    }
}
