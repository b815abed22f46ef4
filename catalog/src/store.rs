//! The embedded catalog store.
//!
//! A store pairs every catalog item with its passage vector, index-aligned
//! and validated at construction. Stores are immutable: a catalog change
//! means building a new store and swapping the handle, never mutating one
//! that readers may be scoring against.

use setu_embeddings::{EmbedRole, Embedder, Embedding, EmbeddingError, NormPolicy, enforce_norm};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::{CatalogError, Result};
use crate::item::CatalogItem;
use crate::projection::TextProjection;

/// How a store derives and validates its vectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Which item fields are embedded.
    pub projection: TextProjection,

    /// Reaction to a vector that is not unit length.
    pub norm_policy: NormPolicy,
}

impl BuildOptions {
    /// Set the text projection.
    pub fn with_projection(mut self, projection: TextProjection) -> Self {
        self.projection = projection;
        self
    }

    /// Set the norm policy.
    pub fn with_norm_policy(mut self, norm_policy: NormPolicy) -> Self {
        self.norm_policy = norm_policy;
        self
    }
}

/// An immutable catalog with one passage vector per item.
///
/// Construction guarantees the invariants scoring relies on: at least one
/// item, vectors index-aligned with items, every vector of the store's
/// dimensionality and unit length.
#[derive(Debug)]
pub struct CatalogStore {
    /// Catalog items, in source order.
    items: Vec<CatalogItem>,

    /// Passage vectors, index-aligned with `items`.
    vectors: Vec<Embedding>,

    /// Dimensionality shared by every vector.
    dimension: usize,
}

impl CatalogStore {
    /// Embed `items` and build a store from the result.
    ///
    /// All passages go to the embedder as one batch, in catalog order.
    pub async fn build(
        items: Vec<CatalogItem>,
        embedder: &dyn Embedder,
        options: &BuildOptions,
    ) -> Result<Self> {
        if items.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }

        let texts: Vec<String> = items
            .iter()
            .map(|item| options.projection.project(item))
            .collect();

        debug!("Embedding {} catalog passages", texts.len());
        let vectors = embedder.embed(&texts, EmbedRole::Passage).await?;

        let store = Self::from_parts(items, vectors, embedder.dimension(), options.norm_policy)?;
        info!(
            "Built catalog store: {} services ({}d)",
            store.size(),
            store.dimension()
        );
        Ok(store)
    }

    /// Assemble a store from already-embedded vectors.
    ///
    /// Applies the same validation as [`build`](Self::build); the vector
    /// cache uses this to skip the embedder on a hit.
    pub fn from_parts(
        items: Vec<CatalogItem>,
        mut vectors: Vec<Embedding>,
        dimension: usize,
        norm_policy: NormPolicy,
    ) -> Result<Self> {
        if items.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }

        if vectors.len() != items.len() {
            return Err(CatalogError::VectorCount {
                expected: items.len(),
                actual: vectors.len(),
            });
        }

        for vector in &mut vectors {
            if vector.len() != dimension {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: dimension,
                    actual: vector.len(),
                }
                .into());
            }
            enforce_norm(vector, norm_policy)?;
        }

        Ok(Self {
            items,
            vectors,
            dimension,
        })
    }

    /// Number of services in the store.
    pub fn size(&self) -> usize {
        self.items.len()
    }

    /// Whether the store holds no services.
    ///
    /// Always false for a constructed store.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Dimensionality of every vector in the store.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// All items, in catalog order.
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// All vectors, index-aligned with [`items`](Self::items).
    pub fn vectors(&self) -> &[Embedding] {
        &self.vectors
    }

    /// The item and vector at `index`.
    pub fn get(&self, index: usize) -> Result<(&CatalogItem, &Embedding)> {
        match (self.items.get(index), self.vectors.get(index)) {
            (Some(item), Some(vector)) => Ok((item, vector)),
            _ => Err(CatalogError::IndexOutOfRange {
                index,
                size: self.items.len(),
            }),
        }
    }

    /// Iterate over aligned (item, vector) pairs in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&CatalogItem, &Embedding)> {
        self.items.iter().zip(self.vectors.iter())
    }
}

/// Content fingerprint of a catalog under a projection and model.
///
/// Digests the model id, the projection, and every item's id and projected
/// text in catalog order. Any change that would alter the embedded
/// passages, including reordering, changes the digest, which is what makes
/// persisted vectors safely reusable.
pub fn fingerprint(items: &[CatalogItem], projection: TextProjection, model: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(model.as_bytes());
    hasher.update([0]);
    hasher.update(format!("{projection:?}").as_bytes());
    hasher.update([0]);

    for item in items {
        hasher.update(item.id.as_str().as_bytes());
        hasher.update([0]);
        hasher.update(projection.project(item).as_bytes());
        hasher.update([0]);
    }

    hex::encode(hasher.finalize())
}
