//! Embedding generation for the refind matching core.
//!
//! The embedding model itself is an external collaborator; this crate owns
//! the [`Embedder`] contract, an HTTP client implementation
//! ([`ApiEmbedder`]) for deployed embedding endpoints, and a deterministic
//! [`StubEmbedder`] used by tests and local runs.

pub mod api;
pub mod config;
pub mod error;
mod normalize;
pub mod stub;

use async_trait::async_trait;

pub use api::ApiEmbedder;
pub use config::EmbedConfig;
pub use error::EmbedError;
pub use stub::StubEmbedder;

/// Contract with the external embedding service. The vector dimension is
/// fixed by the deployed model and identical for every call.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;
}
