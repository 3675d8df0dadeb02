use thiserror::Error;

use crate::types::ItemKind;

/// Errors surfaced by [`ItemStore`](crate::ItemStore) implementations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreError {
    /// The addressed item does not exist.
    #[error("item not found: {kind}/{id}")]
    NotFound { kind: ItemKind, id: String },

    /// The backing store failed internally (lock poisoning, corrupt record).
    #[error("store backend error: {0}")]
    Backend(String),

    /// The remote store could not be reached or timed out.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn backend<E: std::fmt::Display>(err: E) -> Self {
        Self::Backend(err.to_string())
    }

    pub fn not_found(kind: ItemKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}
