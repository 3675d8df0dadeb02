use serde::{Deserialize, Serialize};
use thiserror::Error;

use embed::EmbedError;
use index::IndexError;
use item::{ItemKind, MatchRecord, StoreError};

/// Thresholds for one pipeline run.
///
/// Serde-friendly with per-field defaults so it can be embedded in larger
/// deployment configs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchConfig {
    /// Minimum similarity score for a candidate to be considered at all.
    /// The bound is inclusive: a score equal to the threshold passes.
    #[serde(default = "MatchConfig::default_score_threshold")]
    pub score_threshold: f32,

    /// Score at or above which a category-incompatible pair is accepted
    /// anyway. The override waives compatibility only; the geo gate still
    /// applies.
    #[serde(default = "MatchConfig::default_override_threshold")]
    pub override_threshold: f32,

    /// Geo-gate cutoff in kilometers.
    #[serde(default = "MatchConfig::default_max_distance_km")]
    pub max_distance_km: f64,
}

impl MatchConfig {
    pub(crate) fn default_score_threshold() -> f32 {
        0.70
    }

    pub(crate) fn default_override_threshold() -> f32 {
        0.85
    }

    pub(crate) fn default_max_distance_km() -> f64 {
        2.0
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if !(0.0..=1.0).contains(&self.score_threshold) {
            return Err(MatchError::InvalidConfig(
                "score_threshold must be within [0, 1]".into(),
            ));
        }
        if !(self.score_threshold..=1.0).contains(&self.override_threshold) {
            return Err(MatchError::InvalidConfig(
                "override_threshold must be within [score_threshold, 1]".into(),
            ));
        }
        if self.max_distance_km <= 0.0 {
            return Err(MatchError::InvalidConfig(
                "max_distance_km must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            score_threshold: Self::default_score_threshold(),
            override_threshold: Self::default_override_threshold(),
            max_distance_km: Self::default_max_distance_km(),
        }
    }
}

/// An accepted pair, ready for the ledger: the record destined for the
/// source item's list and the mirror record destined for the target's.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchPair {
    pub target_id: String,
    pub target_kind: ItemKind,
    pub score: f32,
    /// True when compatibility was waived by the override threshold.
    pub via_override: bool,
    /// Appended to the source item; names the target and its category.
    pub source_record: MatchRecord,
    /// Appended to the target item; names the source and its category.
    pub target_record: MatchRecord,
}

/// Result of one pipeline run over one source item.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatchOutcome {
    /// Pairs newly recorded on the source item by this run. Re-evaluated
    /// pairs that were already in the ledger do not count.
    pub accepted: usize,
    pub pairs: Vec<MatchPair>,
}

/// Why a candidate was dropped. Emitted as a structured tracing field, one
/// event per rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    BelowThreshold,
    TargetMissing,
    TargetUnowned,
    Incompatible,
    TooFar,
}

/// Errors produced by the matching layer.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The request itself is malformed (missing id or kind).
    #[error("invalid request: {0}")]
    InvalidInput(String),

    /// The source item does not exist.
    #[error("item not found: {kind}/{id}")]
    NotFound { kind: ItemKind, id: String },

    /// Recheck attempted before initial processing completed.
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    /// Invalid thresholds or retriever configuration.
    #[error("invalid match config: {0}")]
    InvalidConfig(String),

    /// Item store call failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Embedding call failed.
    #[error("embedding error: {0}")]
    Embed(#[from] EmbedError),

    /// Vector index call failed.
    #[error("index error: {0}")]
    Index(#[from] IndexError),
}

impl MatchError {
    /// Stable error-kind string used by the trigger surface and logs.
    pub fn code(&self) -> &'static str {
        match self {
            MatchError::InvalidInput(_) | MatchError::InvalidConfig(_) => "INVALID_INPUT",
            MatchError::NotFound { .. } => "NOT_FOUND",
            MatchError::Store(StoreError::NotFound { .. }) => "NOT_FOUND",
            MatchError::PreconditionFailed(_) => "PRECONDITION_FAILED",
            MatchError::Store(_) | MatchError::Embed(_) | MatchError::Index(_) => {
                "UPSTREAM_UNAVAILABLE"
            }
        }
    }
}
