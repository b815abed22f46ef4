//! The service matcher.

use std::sync::Arc;
use std::time::Duration;

use setu_catalog::{BuildOptions, CatalogItem, CatalogStore};
use setu_embeddings::{EmbedRole, Embedder, Embedding, EmbeddingError, enforce_norm};
use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::MatcherConfig;
use crate::error::{Result, RetrievalError};
use crate::ranker::{self, Selection};
use crate::result::QueryResult;
use crate::scorer::score_all;

/// Shared handle to the current catalog store.
///
/// Readers clone the inner `Arc` and keep scoring against the store they
/// started with; `replace` swaps in a fully built store. A rebuild is
/// never observable half-done.
pub struct SharedCatalog {
    current: RwLock<Arc<CatalogStore>>,
}

impl SharedCatalog {
    /// Wrap an initial store.
    pub fn new(store: CatalogStore) -> Self {
        Self {
            current: RwLock::new(Arc::new(store)),
        }
    }

    /// The current store snapshot.
    pub async fn current(&self) -> Arc<CatalogStore> {
        self.current.read().await.clone()
    }

    /// Swap in a new store, returning the one it replaced.
    pub async fn replace(&self, store: CatalogStore) -> Arc<CatalogStore> {
        let mut guard = self.current.write().await;
        std::mem::replace(&mut *guard, Arc::new(store))
    }
}

/// Statistics about the matcher.
#[derive(Debug, Clone)]
pub struct MatcherStats {
    /// Services in the current catalog.
    pub services: usize,

    /// Vector dimensionality.
    pub dimension: usize,

    /// Embedding model identifier.
    pub model: String,
}

/// Matches free-text citizen queries to catalog services.
///
/// This is the main entry point of the matching system. It coordinates
/// the embedder, the current catalog store, and the scoring and ranking
/// stages. Apart from the embedder call, a query is a pure function of
/// its text, the store snapshot, and the selection: on any error no
/// partial result is returned.
pub struct ServiceMatcher {
    /// Query embedder.
    embedder: Arc<dyn Embedder>,

    /// Current catalog store.
    catalog: SharedCatalog,

    /// Matcher configuration.
    config: MatcherConfig,
}

impl ServiceMatcher {
    /// Create a matcher over an already-built store.
    pub fn new(embedder: Arc<dyn Embedder>, store: CatalogStore) -> Self {
        Self::with_config(embedder, store, MatcherConfig::default())
    }

    /// Create a matcher with an explicit configuration.
    pub fn with_config(
        embedder: Arc<dyn Embedder>,
        store: CatalogStore,
        config: MatcherConfig,
    ) -> Self {
        Self {
            embedder,
            catalog: SharedCatalog::new(store),
            config,
        }
    }

    /// Embed `items` and construct a matcher over the result.
    pub async fn build(
        embedder: Arc<dyn Embedder>,
        items: Vec<CatalogItem>,
        config: MatcherConfig,
    ) -> Result<Self> {
        let options = BuildOptions {
            projection: config.projection,
            norm_policy: config.norm_policy,
        };
        let store = CatalogStore::build(items, embedder.as_ref(), &options).await?;
        Ok(Self::with_config(embedder, store, config))
    }

    /// Match a query using the configured selection.
    pub async fn retrieve(&self, query_text: &str) -> Result<QueryResult> {
        self.retrieve_with(query_text, &self.config.selection())
            .await
    }

    /// Match a query with a per-call selection override.
    pub async fn retrieve_with(
        &self,
        query_text: &str,
        selection: &Selection,
    ) -> Result<QueryResult> {
        if query_text.trim().is_empty() {
            return Err(RetrievalError::EmptyQuery);
        }

        debug!("Matching query: {query_text}");

        let mut query = self.embed_query(query_text).await?;
        enforce_norm(&mut query, self.config.norm_policy)?;

        let store = self.catalog.current().await;
        let scores = score_all(&query, &store)?;
        let result = ranker::rank(&scores, &store, selection);

        debug!("Query matched {} of {} services", result.len(), store.size());
        Ok(result)
    }

    /// Embed the query, retrying transient failures with doubling backoff.
    ///
    /// Identical queries are embedded every time; there is no per-query
    /// cache to go stale.
    async fn embed_query(&self, query_text: &str) -> Result<Embedding> {
        let mut backoff = Duration::from_millis(self.config.retry_backoff_ms);
        let mut attempt = 0;

        loop {
            match self.try_embed(query_text).await {
                Ok(vector) => return Ok(vector),
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    attempt += 1;
                    warn!("Query embedding failed (attempt {attempt}): {e}, retrying");
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// One embedding attempt under the configured timeout.
    async fn try_embed(&self, query_text: &str) -> Result<Embedding> {
        let texts = vec![query_text.to_string()];
        let deadline = Duration::from_secs(self.config.embed_timeout_secs);

        let vectors = match timeout(deadline, self.embedder.embed(&texts, EmbedRole::Query)).await {
            Ok(embedded) => embedded?,
            Err(_) => {
                return Err(RetrievalError::EncodingTimeout {
                    timeout_secs: self.config.embed_timeout_secs,
                });
            }
        };

        vectors.into_iter().next().ok_or_else(|| {
            RetrievalError::Embedding(EmbeddingError::InvalidResponse(
                "embedder returned no vector for the query".to_string(),
            ))
        })
    }

    /// Rebuild the catalog from fresh items and swap it in.
    ///
    /// Queries running during the rebuild keep answering from the store
    /// they snapshotted; queries started afterwards see the new one.
    pub async fn rebuild(&self, items: Vec<CatalogItem>) -> Result<()> {
        let options = BuildOptions {
            projection: self.config.projection,
            norm_policy: self.config.norm_policy,
        };
        let store = CatalogStore::build(items, self.embedder.as_ref(), &options).await?;
        let size = store.size();

        let previous = self.catalog.replace(store).await;
        info!("Catalog swapped: {size} services (was {})", previous.size());
        Ok(())
    }

    /// The current catalog snapshot.
    pub async fn snapshot(&self) -> Arc<CatalogStore> {
        self.catalog.current().await
    }

    /// Statistics about the matcher.
    pub async fn stats(&self) -> MatcherStats {
        let store = self.catalog.current().await;
        MatcherStats {
            services: store.size(),
            dimension: store.dimension(),
            model: self.embedder.model().to_string(),
        }
    }

    /// The matcher configuration.
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }
}
