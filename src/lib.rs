//! Workspace umbrella crate for refind, a lost & found reconciliation
//! engine.
//!
//! The member crates each own one stage — the item model and store
//! contract, the static compatibility heuristics, embedding generation,
//! candidate retrieval, and the match pipeline with its ledger. This crate
//! stitches them together: [`config::RefindConfig`] is the single YAML
//! deployment configuration, and [`ingest::IngestPipeline`] is the
//! item-created entry point that enriches a fresh report, indexes its
//! embedding, and runs the first similarity check.

pub mod config;
pub mod ingest;

pub use classify::{
    classify_compatibility, extract_object_type, geo_gate, haversine_km, CompatDecision,
    CompatReason, GeoDecision, GeoReason, TaxonomyConfig,
};
pub use embed::{ApiEmbedder, EmbedConfig, EmbedError, Embedder, StubEmbedder};
pub use index::{
    find_candidates, vector_id, Candidate, InMemoryIndex, IndexError, Neighbor, RetrieverConfig,
    VectorIndex,
};
pub use item::{
    Coordinates, InMemoryStore, Item, ItemKind, ItemPatch, ItemStore, MatchRecord, MatchStatus,
    StoreError,
};
pub use matcher::{
    set_match_metrics, Ledger, MatchConfig, MatchEngine, MatchError, MatchMetrics, MatchOutcome,
    MatchPair,
};

pub use config::{ConfigLoadError, RefindConfig};
pub use ingest::{IngestError, IngestPipeline, StubSummarizer, StubVision, TextSummarizer, VisionAnalyzer};
