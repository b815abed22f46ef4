//! Configuration for the service matcher.

use serde::{Deserialize, Serialize};
use setu_catalog::TextProjection;
use setu_embeddings::NormPolicy;

use crate::ranker::Selection;

/// Matches returned when neither `top_k` nor `min_score` is configured.
pub const DEFAULT_TOP_K: usize = 10;

/// Configuration for the service matcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Maximum number of matches to return.
    pub top_k: Option<usize>,

    /// Minimum similarity score for a match.
    pub min_score: Option<f32>,

    /// Seconds allowed for a single embedding call.
    pub embed_timeout_secs: u64,

    /// Retry budget for transient embedder failures.
    pub max_retries: u32,

    /// Initial backoff between retries, doubled per attempt.
    pub retry_backoff_ms: u64,

    /// Which item fields are embedded as passage text.
    pub projection: TextProjection,

    /// Reaction to a vector that is not unit length.
    pub norm_policy: NormPolicy,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            top_k: Some(DEFAULT_TOP_K),
            min_score: None,
            embed_timeout_secs: 30,
            max_retries: 1,
            retry_backoff_ms: 250,
            projection: TextProjection::default(),
            norm_policy: NormPolicy::default(),
        }
    }
}

impl MatcherConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of matches.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }

    /// Set the minimum similarity score.
    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = Some(min_score);
        self
    }

    /// Return every match above `min_score`, with no count cap.
    pub fn with_threshold_only(mut self, min_score: f32) -> Self {
        self.top_k = None;
        self.min_score = Some(min_score);
        self
    }

    /// Set the embedding call timeout.
    pub fn with_embed_timeout_secs(mut self, secs: u64) -> Self {
        self.embed_timeout_secs = secs;
        self
    }

    /// Set the retry budget for transient embedder failures.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

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

    /// The selection mode implied by `top_k` and `min_score`.
    ///
    /// Both set means threshold filter first, then the count cap. Neither
    /// set falls back to the default cap so an unconfigured matcher never
    /// returns the entire catalog.
    pub fn selection(&self) -> Selection {
        match (self.top_k, self.min_score) {
            (Some(limit), Some(min_score)) => Selection::ThresholdCapped { min_score, limit },
            (None, Some(min_score)) => Selection::Threshold { min_score },
            (Some(k), None) => Selection::TopK(k),
            (None, None) => Selection::TopK(DEFAULT_TOP_K),
        }
    }
}
