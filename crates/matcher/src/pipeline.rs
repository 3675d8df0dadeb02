use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::future::join_all;

use classify::{classify_compatibility, geo_gate, TaxonomyConfig};
use embed::Embedder;
use index::{find_candidates, Candidate, RetrieverConfig, VectorIndex};
use item::{Item, ItemStore, MatchRecord, MatchStatus};

use crate::ledger::Ledger;
use crate::metrics::metrics_recorder;
use crate::types::{MatchConfig, MatchError, MatchOutcome, MatchPair, RejectReason};

/// Orchestrates retrieval, classification, the geo gate, and ledger writes
/// for one source item at a time.
pub struct MatchEngine {
    pub(crate) store: Arc<dyn ItemStore>,
    pub(crate) index: Arc<dyn VectorIndex>,
    pub(crate) embedder: Arc<dyn Embedder>,
    pub(crate) ledger: Ledger,
    pub(crate) taxonomy: Arc<TaxonomyConfig>,
    pub(crate) match_cfg: MatchConfig,
    pub(crate) retriever_cfg: RetrieverConfig,
}

impl MatchEngine {
    pub fn new(
        store: Arc<dyn ItemStore>,
        index: Arc<dyn VectorIndex>,
        embedder: Arc<dyn Embedder>,
        taxonomy: Arc<TaxonomyConfig>,
        match_cfg: MatchConfig,
        retriever_cfg: RetrieverConfig,
    ) -> Result<Self, MatchError> {
        match_cfg.validate()?;
        retriever_cfg
            .validate()
            .map_err(|e| MatchError::InvalidConfig(e.to_string()))?;
        let ledger = Ledger::new(store.clone());
        Ok(Self {
            store,
            index,
            embedder,
            ledger,
            taxonomy,
            match_cfg,
            retriever_cfg,
        })
    }

    /// One full run: retrieve candidates for `embedding`, decide, and
    /// commit accepted pairs through the ledger.
    pub async fn check_item(
        &self,
        source: &Item,
        embedding: &[f32],
    ) -> Result<MatchOutcome, MatchError> {
        let start = Instant::now();
        let target_kind = source.kind.opposite();

        let candidates =
            find_candidates(self.index.as_ref(), embedding, target_kind, &self.retriever_cfg)
                .await?;
        let pairs = self.evaluate(source, &candidates).await?;

        let mut accepted = 0;
        for pair in &pairs {
            if self.ledger.commit_pair(source, pair).await? {
                accepted += 1;
            }
        }

        let latency = start.elapsed();
        if let Some(recorder) = metrics_recorder() {
            recorder.record_run(source.kind, latency, accepted);
        }
        tracing::info!(
            kind = %source.kind,
            item_id = %source.id,
            candidates = candidates.len(),
            accepted,
            "similarity check complete"
        );

        Ok(MatchOutcome { accepted, pairs })
    }

    /// Decide, without writing: turn candidates into accepted pairs.
    ///
    /// Candidates arrive in descending score order and are evaluated in
    /// that order. Candidate detail reads are independent of one another
    /// and issued concurrently; everything after the fetch is sequential.
    pub async fn evaluate(
        &self,
        source: &Item,
        candidates: &[Candidate],
    ) -> Result<Vec<MatchPair>, MatchError> {
        let source_user = match source.user_id.as_deref() {
            Some(user) => user,
            None => {
                tracing::warn!(
                    kind = %source.kind,
                    item_id = %source.id,
                    "source item has no owner, skipping run"
                );
                return Ok(Vec::new());
            }
        };

        let target_kind = source.kind.opposite();
        let scored: Vec<&Candidate> = candidates
            .iter()
            .filter(|c| {
                let passes = c.score >= self.match_cfg.score_threshold;
                if !passes {
                    tracing::debug!(
                        target_id = %c.item_id,
                        score = c.score,
                        reason = ?RejectReason::BelowThreshold,
                        "candidate rejected"
                    );
                }
                passes
            })
            .collect();

        let fetched = join_all(
            scored
                .iter()
                .map(|c| self.store.read(target_kind, &c.item_id)),
        )
        .await;

        let now = Utc::now();
        let mut pairs = Vec::new();
        for (candidate, target) in scored.into_iter().zip(fetched) {
            let target = match target? {
                Some(target) => target,
                None => {
                    tracing::debug!(
                        target_id = %candidate.item_id,
                        reason = ?RejectReason::TargetMissing,
                        "candidate rejected"
                    );
                    continue;
                }
            };
            let target_user = match target.user_id.as_deref() {
                Some(user) => user,
                None => {
                    tracing::debug!(
                        target_id = %target.id,
                        reason = ?RejectReason::TargetUnowned,
                        "candidate rejected"
                    );
                    continue;
                }
            };

            let compat = classify_compatibility(
                &source.category,
                &target.category,
                source.image_analysis.as_deref(),
                target.image_analysis.as_deref(),
                &self.taxonomy,
            );
            let via_override = if compat.compatible {
                false
            } else if candidate.score >= self.match_cfg.override_threshold {
                tracing::debug!(
                    target_id = %target.id,
                    score = candidate.score,
                    "category mismatch waived by override threshold"
                );
                true
            } else {
                tracing::debug!(
                    target_id = %target.id,
                    score = candidate.score,
                    compat_reason = ?compat.reason,
                    reason = ?RejectReason::Incompatible,
                    "candidate rejected"
                );
                continue;
            };

            let geo = geo_gate(
                source.coordinates,
                target.coordinates,
                self.match_cfg.max_distance_km,
            );
            if !geo.passed {
                tracing::debug!(
                    target_id = %target.id,
                    distance_km = geo.distance_km,
                    reason = ?RejectReason::TooFar,
                    "candidate rejected"
                );
                continue;
            }

            tracing::debug!(
                target_id = %target.id,
                score = candidate.score,
                via_override,
                compat_reason = ?compat.reason,
                geo_reason = ?geo.reason,
                "candidate accepted"
            );
            pairs.push(MatchPair {
                target_id: target.id.clone(),
                target_kind,
                score: candidate.score,
                via_override,
                source_record: MatchRecord {
                    item_id: target.id.clone(),
                    user_id: target_user.to_string(),
                    score: candidate.score,
                    kind: target_kind,
                    status: MatchStatus::Pending,
                    created_at: now,
                    category: target.category.clone(),
                },
                target_record: MatchRecord {
                    item_id: source.id.clone(),
                    user_id: source_user.to_string(),
                    score: candidate.score,
                    kind: source.kind,
                    status: MatchStatus::Pending,
                    created_at: now,
                    category: source.category.clone(),
                },
            });
        }

        Ok(pairs)
    }
}
