use thiserror::Error;

/// Errors surfaced by embedder implementations.
#[derive(Debug, Error, Clone)]
pub enum EmbedError {
    /// Configuration is inconsistent (e.g. api mode without a URL).
    #[error("invalid embed config: {0}")]
    InvalidConfig(String),

    /// The HTTP request failed or timed out.
    #[error("embedding request failed: {0}")]
    Http(String),

    /// The service answered, but not with a usable vector.
    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),
}
