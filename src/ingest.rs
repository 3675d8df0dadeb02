//! Item-created ingestion: enrich a fresh report, index its embedding, and
//! run the first similarity check.
//!
//! The vision analyzer and text summarizer are external collaborators that
//! produce opaque free text; their output is never parsed beyond the
//! object-type heuristics and the embedding-input assembly.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use embed::{EmbedError, Embedder};
use index::{vector_id, IndexError, VectorIndex};
use item::{Item, ItemPatch, ItemStore, StoreError};
use matcher::{MatchEngine, MatchError, MatchOutcome};

/// Produces a free-text description of the item image at `image_url`.
#[async_trait]
pub trait VisionAnalyzer: Send + Sync {
    async fn analyze_image(&self, image_url: &str) -> Result<String, IngestError>;
}

/// Produces a free-text semantic summary from an assembled prompt.
#[async_trait]
pub trait TextSummarizer: Send + Sync {
    async fn summarize(&self, prompt: &str) -> Result<String, IngestError>;
}

/// Vision stub returning a fixed description, for tests and local runs.
pub struct StubVision(pub String);

#[async_trait]
impl VisionAnalyzer for StubVision {
    async fn analyze_image(&self, _image_url: &str) -> Result<String, IngestError> {
        Ok(self.0.clone())
    }
}

/// Summarizer stub echoing its prompt, for tests and local runs.
pub struct StubSummarizer;

#[async_trait]
impl TextSummarizer for StubSummarizer {
    async fn summarize(&self, prompt: &str) -> Result<String, IngestError> {
        Ok(prompt.trim().to_string())
    }
}

/// Errors surfaced by the ingestion path.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("vision analysis failed: {0}")]
    Vision(String),

    #[error("summary generation failed: {0}")]
    Summarizer(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("embedding error: {0}")]
    Embed(#[from] EmbedError),

    #[error("index error: {0}")]
    Index(#[from] IndexError),

    #[error(transparent)]
    Match(#[from] MatchError),
}

impl IngestError {
    /// Stable error-kind string used by the trigger surface and logs.
    pub fn code(&self) -> &'static str {
        match self {
            IngestError::Vision(_)
            | IngestError::Summarizer(_)
            | IngestError::Embed(_)
            | IngestError::Index(_) => "UPSTREAM_UNAVAILABLE",
            IngestError::Store(StoreError::NotFound { .. }) => "NOT_FOUND",
            IngestError::Store(_) => "UPSTREAM_UNAVAILABLE",
            IngestError::Match(err) => err.code(),
        }
    }
}

/// Prompt handed to the external summarizer. The image analysis is named
/// as the most reliable source so the summary leads with the object type
/// seen in the image rather than the user's category guess.
pub fn semantic_summary_prompt(item: &Item, image_description: &str) -> String {
    format!(
        "Create a detailed semantic summary for a lost/found item matching system.\n\
         The image analysis is the most reliable source; prioritize it.\n\
         \n\
         Given information:\n\
         - Item Name: {name}\n\
         - Category: {category}\n\
         - Location: {location}\n\
         - Location Details: {location_details}\n\
         - User Description: {raw}\n\
         - Image Analysis: {image}\n\
         \n\
         Start with the exact object type from the image analysis, then brand,\n\
         color, material and distinctive features, then context from the user\n\
         description and the location. Be specific about the object type.\n\
         Format: [Object Type] - [Brand/Model] - [Color] - [Material] - \
         [Key Features] - [Location Context]\n\
         Return only the summary.",
        name = item.name,
        category = item.category,
        location = item.location.as_deref().unwrap_or("Unknown"),
        location_details = item.location_description.as_deref().unwrap_or("None"),
        raw = item.raw_description,
        image = image_description,
    )
}

/// The item-created entry point.
///
/// One `process_item_created` call is one independent run; runs for
/// different items execute concurrently with no coordination. A failure
/// anywhere aborts the rest of the run, and the upstream event delivery is
/// expected to retry — every step here is idempotent under re-delivery.
pub struct IngestPipeline {
    store: Arc<dyn ItemStore>,
    index: Arc<dyn VectorIndex>,
    embedder: Arc<dyn Embedder>,
    vision: Arc<dyn VisionAnalyzer>,
    summarizer: Arc<dyn TextSummarizer>,
    engine: Arc<MatchEngine>,
}

impl IngestPipeline {
    pub fn new(
        store: Arc<dyn ItemStore>,
        index: Arc<dyn VectorIndex>,
        embedder: Arc<dyn Embedder>,
        vision: Arc<dyn VisionAnalyzer>,
        summarizer: Arc<dyn TextSummarizer>,
        engine: Arc<MatchEngine>,
    ) -> Self {
        Self {
            store,
            index,
            embedder,
            vision,
            summarizer,
            engine,
        }
    }

    /// Ingest a freshly created report and run its first similarity check.
    ///
    /// Items that already carry an `embedding_id` were processed by an
    /// earlier delivery of the same event; they are skipped wholesale.
    pub async fn process_item_created(&self, item: &Item) -> Result<MatchOutcome, IngestError> {
        if item.embedding_id.is_some() {
            tracing::info!(
                kind = %item.kind,
                item_id = %item.id,
                "item already processed, skipping"
            );
            return Ok(MatchOutcome::default());
        }
        tracing::info!(kind = %item.kind, item_id = %item.id, "processing new item");

        let image_analysis = match item.image_url.as_deref() {
            Some(url) => self.vision.analyze_image(url).await?,
            None => String::new(),
        };

        let prompt = semantic_summary_prompt(item, &image_analysis);
        let semantic_description = self.summarizer.summarize(&prompt).await?.trim().to_string();

        let mut enriched = item.clone();
        if !image_analysis.is_empty() {
            enriched.image_analysis = Some(image_analysis.clone());
        }
        enriched.semantic_description = Some(semantic_description.clone());

        let embedding = self.embedder.embed(&enriched.embedding_input()).await?;
        let embedding_id = vector_id(item.kind, &item.id);
        self.index.upsert(&embedding_id, &embedding).await?;

        self.store
            .update(
                item.kind,
                &item.id,
                ItemPatch {
                    image_analysis: (!image_analysis.is_empty()).then_some(image_analysis),
                    semantic_description: Some(semantic_description),
                    embedding_id: Some(embedding_id.clone()),
                    ..ItemPatch::default()
                },
            )
            .await?;
        enriched.embedding_id = Some(embedding_id);

        let outcome = self.engine.check_item(&enriched, &embedding).await?;
        Ok(outcome)
    }
}
