use std::sync::Arc;

use embed::{ApiEmbedder, Embedder, StubEmbedder};
use index::InMemoryIndex;
use item::InMemoryStore;
use matcher::MatchEngine;
use refind::{IngestPipeline, RefindConfig, StubSummarizer, StubVision};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Item store (shared across requests). In-memory here; a production
    /// deployment wires the document-store adapter instead.
    pub store: Arc<InMemoryStore>,

    /// Match engine (shared across requests)
    pub engine: Arc<MatchEngine>,

    /// Item-created ingestion pipeline (shared across requests)
    pub ingest: Arc<IngestPipeline>,
}

impl ServerState {
    /// Create new server state from the server and pipeline configs.
    pub fn new(config: ServerConfig, pipeline: RefindConfig) -> ServerResult<Self> {
        pipeline
            .validate()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        let store = Arc::new(InMemoryStore::new());
        let index = Arc::new(InMemoryIndex::new());

        let embedder: Arc<dyn Embedder> = match pipeline.embed.mode.as_str() {
            "api" => Arc::new(
                ApiEmbedder::new(pipeline.embed.clone())
                    .map_err(|e| ServerError::Config(e.to_string()))?,
            ),
            _ => Arc::new(StubEmbedder::new(&pipeline.embed)),
        };

        let engine = Arc::new(
            MatchEngine::new(
                store.clone(),
                index.clone(),
                embedder.clone(),
                Arc::new(pipeline.taxonomy.clone()),
                pipeline.matcher.clone(),
                pipeline.retriever.clone(),
            )
            .map_err(ServerError::Match)?,
        );

        // Vision and summarization are external collaborators; the stubs
        // keep the local surface self-contained.
        let ingest = Arc::new(IngestPipeline::new(
            store.clone(),
            index,
            embedder,
            Arc::new(StubVision(String::new())),
            Arc::new(StubSummarizer),
            engine.clone(),
        ));

        Ok(Self {
            config: Arc::new(config),
            store,
            engine,
            ingest,
        })
    }
}
