//! # Embeddings
//!
//! This crate defines the embedding contract for the Setu service-matching
//! system: how text becomes comparable dense vectors.
//!
//! ## Features
//!
//! - **Embedder Contract**: Batched, role-tagged text-to-vector conversion
//! - **Role Tagging**: Explicit passage/query asymmetry for E5-style encoders
//! - **Vector Math**: Dot product, cosine similarity, norm enforcement
//! - **HTTP Adapter**: Client for a text-embeddings-inference style service
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       Embeddings System                         │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  Embedder ──► EmbedRole ──► Embedding                           │
//! │      │                          │                               │
//! │      ▼                          ▼                               │
//! │  HttpEmbedder              similarity (dot / norm)              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The encoder itself (model weights, device placement, serving) lives
//! behind the [`Embedder`] trait and is never constructed here.

pub mod embedder;
pub mod error;
pub mod similarity;

pub use embedder::{EmbedRole, Embedder, HttpEmbedder};
pub use error::{EmbeddingError, Result};
pub use similarity::{NormPolicy, cosine_similarity, dot, enforce_norm, is_normalized, l2_norm};

/// A dense vector embedding.
pub type Embedding = Vec<f32>;

/// Dimension of multilingual-e5-base output, the default deployment.
pub const DEFAULT_DIMENSION: usize = 768;

/// Default model served behind the HTTP embedder.
pub const DEFAULT_MODEL: &str = "intfloat/multilingual-e5-base";

/// Allowed deviation of a unit vector's Euclidean norm from 1.0.
pub const NORM_TOLERANCE: f32 = 1e-3;
