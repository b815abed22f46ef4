//! The embedder contract and its HTTP adapter.
//!
//! Encoders in the E5 family produce materially different vectors for
//! indexed content ("passage") and search input ("query"), so every text
//! is tagged with an [`EmbedRole`] before it reaches the model. The role
//! is part of the contract, not a string convention callers remember to
//! apply.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{EmbeddingError, Result};
use crate::{DEFAULT_DIMENSION, DEFAULT_MODEL, Embedding};

/// How a text participates in retrieval: as indexed content or as a
/// search query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbedRole {
    /// Catalog content being indexed.
    Passage,

    /// User input being searched.
    Query,
}

impl EmbedRole {
    /// The E5 instruction prefix for this role.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Passage => "passage: ",
            Self::Query => "query: ",
        }
    }

    /// Prepend the role prefix to a text.
    pub fn tag(self, text: &str) -> String {
        let prefix = self.prefix();
        format!("{prefix}{text}")
    }
}

/// Trait for converting batches of text into dense vectors.
///
/// Implementations must preserve input order, return one vector per
/// input, keep every vector at the fixed dimensionality reported by
/// [`dimension`](Self::dimension), and L2-normalize the output.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Identifier of the backing model.
    fn model(&self) -> &str;

    /// Fixed output dimensionality for this deployment.
    fn dimension(&self) -> usize;

    /// Embed a batch of texts under the given role.
    async fn embed(&self, texts: &[String], role: EmbedRole) -> Result<Vec<Embedding>>;
}

/// Embedder backed by a text-embeddings-inference style HTTP service.
///
/// The service hosts the actual encoder (multilingual-e5-base by
/// default); this adapter only tags roles, ships batches, and validates
/// the response shape.
pub struct HttpEmbedder {
    /// Service base URL, without trailing slash.
    base_url: String,

    /// Optional bearer token.
    api_key: Option<String>,

    /// HTTP client.
    client: reqwest::Client,

    /// Reported model identifier.
    model: String,

    /// Expected output dimensionality.
    dimension: usize,
}

impl HttpEmbedder {
    /// Create a new HTTP embedder for the service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            client: reqwest::Client::new(),
            model: DEFAULT_MODEL.to_string(),
            dimension: DEFAULT_DIMENSION,
        }
    }

    /// Set the bearer token sent with every request.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the reported model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the expected output dimensionality.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Whether the embedding service answers its health probe.
    pub async fn health(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.client.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Embedder health probe failed: {e}");
                false
            }
        }
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    fn model(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[String], role: EmbedRole) -> Result<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let inputs: Vec<String> = texts.iter().map(|t| role.tag(t)).collect();

        debug!(
            "Embedding {} texts with role {role:?} via {}",
            inputs.len(),
            self.model
        );

        // `normalize` makes the service return unit vectors, which is
        // what every downstream score computation assumes.
        let body = serde_json::json!({
            "inputs": inputs,
            "normalize": true,
            "truncate": true,
        });

        let mut request = self
            .client
            .post(format!("{}/embed", self.base_url))
            .header("Content-Type", "application/json")
            .json(&body);

        if let Some(api_key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = request.send().await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);

            return Err(EmbeddingError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Encoding(format!(
                "embedding service returned {status}: {error_text}"
            )));
        }

        let vectors: Vec<Embedding> = response.json().await?;

        if vectors.len() != texts.len() {
            return Err(EmbeddingError::InvalidResponse(format!(
                "requested {} embeddings, got {}",
                texts.len(),
                vectors.len()
            )));
        }

        for vector in &vectors {
            if vector.len() != self.dimension {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: self.dimension,
                    actual: vector.len(),
                });
            }
        }

        info!("Embedded {} texts ({}d)", vectors.len(), self.dimension);

        Ok(vectors)
    }
}
