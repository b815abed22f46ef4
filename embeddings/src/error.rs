//! Error types for the embeddings system.

use thiserror::Error;

/// Result type alias for embedding operations.
pub type Result<T> = std::result::Result<T, EmbeddingError>;

/// Errors that can occur while producing or validating embeddings.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// The encoder rejected or failed the request.
    #[error("encoding failed: {0}")]
    Encoding(String),

    /// Response from the embedding service did not match the request.
    #[error("invalid embedder response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded.
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Dimension mismatch.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Vector violates the unit-norm invariant.
    #[error("vector is not unit-normalized: norm {norm}")]
    Unnormalized { norm: f32 },

    /// HTTP error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl EmbeddingError {
    /// Whether a retry could plausibly succeed.
    ///
    /// Shape errors (wrong dimension, denormalized vectors, mismatched
    /// response) are structural and never retried.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Encoding(_) | Self::RateLimited { .. } | Self::Http(_)
        )
    }
}
