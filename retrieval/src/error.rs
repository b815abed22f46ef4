//! Error types for the retrieval engine.

use setu_catalog::CatalogError;
use setu_embeddings::EmbeddingError;
use thiserror::Error;

/// Result type alias for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;

/// Errors that can occur while matching a query.
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// The query text is empty or whitespace.
    #[error("query text is empty")]
    EmptyQuery,

    /// The embedder did not answer within the configured timeout.
    #[error("query encoding timed out after {timeout_secs}s")]
    EncodingTimeout { timeout_secs: u64 },

    /// Failure from the embedding layer.
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Failure from the catalog layer.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl RetrievalError {
    /// Whether retrying the operation could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::EncodingTimeout { .. } => true,
            Self::Embedding(e) => e.is_transient(),
            Self::EmptyQuery | Self::Catalog(_) => false,
        }
    }
}
