//! Query-to-catalog scoring.

use setu_catalog::CatalogStore;
use setu_embeddings::{Embedding, EmbeddingError, dot, is_normalized, l2_norm};
use tracing::debug;

use crate::error::Result;

/// Score a query vector against every passage in the store.
///
/// Output is index-aligned with the store: `scores[i]` belongs to item
/// `i`. Both sides are unit vectors (store vectors are validated at build
/// time, the query is checked here), so each dot product is the cosine
/// similarity, in [-1.0, 1.0].
pub fn score_all(query: &Embedding, store: &CatalogStore) -> Result<Vec<f32>> {
    if query.len() != store.dimension() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: store.dimension(),
            actual: query.len(),
        }
        .into());
    }

    if !is_normalized(query) {
        return Err(EmbeddingError::Unnormalized {
            norm: l2_norm(query),
        }
        .into());
    }

    let mut scores = Vec::with_capacity(store.size());
    for vector in store.vectors() {
        scores.push(dot(query, vector)?);
    }

    debug!("Scored query against {} services", scores.len());
    Ok(scores)
}
