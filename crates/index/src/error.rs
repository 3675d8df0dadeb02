use thiserror::Error;

/// Errors surfaced by [`VectorIndex`](crate::VectorIndex) implementations.
#[derive(Debug, Error, Clone)]
pub enum IndexError {
    /// The index failed internally.
    #[error("index backend error: {0}")]
    Backend(String),

    /// The remote index could not be reached or timed out.
    #[error("index unavailable: {0}")]
    Unavailable(String),
}

impl IndexError {
    pub fn backend<E: std::fmt::Display>(err: E) -> Self {
        Self::Backend(err.to_string())
    }
}
