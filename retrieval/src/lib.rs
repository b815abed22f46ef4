//! # Retrieval
//!
//! The query side of the Setu service-matching system: turn a free-text
//! citizen question into a ranked list of government services.
//!
//! ## Features
//!
//! - **Scoring**: Dot-product similarity of a query against every catalog passage
//! - **Ranking**: Top-k and threshold selection with deterministic tie-breaks
//! - **Matcher**: Orchestrates embedding, scoring, and ranking with retry and timeout
//! - **Live Rebuild**: Catalog swaps that never disturb in-flight queries
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         ServiceMatcher                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  query text ──► Embedder (query role) ──► query vector          │
//! │                                               │                 │
//! │  SharedCatalog ──► store snapshot ──► score_all ──► rank        │
//! │                                                      │          │
//! │                                                 QueryResult     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Scoring and ranking are pure synchronous functions; only the embedder
//! boundary is async.

pub mod config;
pub mod engine;
pub mod error;
pub mod ranker;
pub mod result;
pub mod scorer;

pub use config::{DEFAULT_TOP_K, MatcherConfig};
pub use engine::{MatcherStats, ServiceMatcher, SharedCatalog};
pub use error::{Result, RetrievalError};
pub use ranker::{Selection, rank, threshold, top_k};
pub use result::{QueryResult, ScoredMatch};
pub use scorer::score_all;
