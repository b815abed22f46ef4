//! Persisted catalog vectors.
//!
//! Embedding the full catalog costs an encoder pass over every passage,
//! so the resulting vectors are persisted next to the catalog, keyed by
//! its content fingerprint. A restart with an unchanged catalog reuses
//! the file; any change to item text, ordering, projection, or model
//! changes the fingerprint and forces a rebuild.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use setu_embeddings::{Embedder, Embedding};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::item::{CatalogItem, ServiceId};
use crate::store::{BuildOptions, CatalogStore, fingerprint};

/// One persisted vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    /// Item the vector belongs to.
    id: ServiceId,

    /// The passage vector.
    vector: Embedding,
}

/// On-disk shape of the cache.
#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    /// Fingerprint of the catalog the vectors were derived from.
    content_hash: String,

    /// Model that produced the vectors.
    model: String,

    /// Vector dimensionality.
    dimension: usize,

    /// Per-item vectors, in catalog order.
    entries: Vec<CacheEntry>,
}

/// Vector cache at a fixed file path.
pub struct VectorCache {
    path: PathBuf,
}

impl VectorCache {
    /// Create a cache handle for the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the cache file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load cached vectors if they still match the current catalog.
    ///
    /// Returns `None` when the file is missing, fails to parse, carries a
    /// different fingerprint or dimensionality, or its entries do not line
    /// up with `items`. A file that exists but cannot be read is an error.
    pub async fn load(
        &self,
        items: &[CatalogItem],
        expected_hash: &str,
        dimension: usize,
    ) -> Result<Option<Vec<Embedding>>> {
        if !self.path.exists() {
            debug!("No vector cache at {}", self.path.display());
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).await?;

        let file: CacheFile = match serde_json::from_str(&content) {
            Ok(file) => file,
            Err(e) => {
                warn!("Discarding corrupt vector cache {}: {e}", self.path.display());
                return Ok(None);
            }
        };

        if file.content_hash != expected_hash {
            warn!("Vector cache {} is stale, rebuilding", self.path.display());
            return Ok(None);
        }

        if file.dimension != dimension {
            warn!(
                "Vector cache dimension {} does not match embedder dimension {dimension}",
                file.dimension
            );
            return Ok(None);
        }

        let aligned = file.entries.len() == items.len()
            && file
                .entries
                .iter()
                .zip(items)
                .all(|(entry, item)| entry.id == item.id);
        if !aligned {
            warn!("Vector cache entries do not line up with the catalog, rebuilding");
            return Ok(None);
        }

        debug!("Vector cache hit: {} entries", file.entries.len());
        Ok(Some(file.entries.into_iter().map(|e| e.vector).collect()))
    }

    /// Persist the store's vectors under `content_hash`.
    pub async fn persist(
        &self,
        content_hash: &str,
        model: &str,
        store: &CatalogStore,
    ) -> Result<()> {
        let file = CacheFile {
            content_hash: content_hash.to_string(),
            model: model.to_string(),
            dimension: store.dimension(),
            entries: store
                .iter()
                .map(|(item, vector)| CacheEntry {
                    id: item.id.clone(),
                    vector: vector.clone(),
                })
                .collect(),
        };

        let content = serde_json::to_string(&file)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write atomically using a temp file
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, &content).await?;
        fs::rename(&temp_path, &self.path).await?;

        info!(
            "Persisted {} catalog vectors to {}",
            file.entries.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Build a store, reusing persisted vectors when they are still valid.
    ///
    /// On a hit the embedder is never called. On a miss the store is built
    /// through the embedder and the fresh vectors are persisted; a persist
    /// failure is logged but does not fail the build.
    pub async fn load_or_build(
        &self,
        items: Vec<CatalogItem>,
        embedder: &dyn Embedder,
        options: &BuildOptions,
    ) -> Result<CatalogStore> {
        let hash = fingerprint(&items, options.projection, embedder.model());

        if let Some(vectors) = self.load(&items, &hash, embedder.dimension()).await? {
            match CatalogStore::from_parts(
                items.clone(),
                vectors,
                embedder.dimension(),
                options.norm_policy,
            ) {
                Ok(store) => {
                    info!("Reusing {} cached catalog vectors", store.size());
                    return Ok(store);
                }
                Err(e) => warn!("Cached vectors failed validation: {e}"),
            }
        }

        let store = CatalogStore::build(items, embedder, options).await?;

        if let Err(e) = self.persist(&hash, embedder.model(), &store).await {
            warn!("Failed to persist vector cache: {e}");
        }

        Ok(store)
    }
}
