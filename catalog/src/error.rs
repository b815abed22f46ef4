//! Error types for the catalog system.

use setu_embeddings::EmbeddingError;
use thiserror::Error;

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors that can occur while loading or embedding the catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog has no services to embed.
    #[error("catalog contains no services")]
    EmptyCatalog,

    /// An index past the end of the store.
    #[error("index {index} out of range for catalog of size {size}")]
    IndexOutOfRange { index: usize, size: usize },

    /// The embedder returned the wrong number of vectors.
    #[error("expected {expected} vectors, got {actual}")]
    VectorCount { expected: usize, actual: usize },

    /// Failure while producing or validating vectors.
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    /// The catalog source could not be read.
    #[error("catalog source error: {0}")]
    Source(String),

    /// JSON serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// File system failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
