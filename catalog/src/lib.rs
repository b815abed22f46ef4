//! # Catalog
//!
//! The fixed set of government services a citizen query is matched
//! against: loaded from the Setu portal's bilingual records, projected to
//! passage text, and embedded once into an immutable vector store.
//!
//! ## Features
//!
//! - **Bilingual Source**: `services.json` records with per-field locale fallback
//! - **Text Projection**: Configurable item-to-passage mapping
//! - **Embedded Store**: Index-aligned items and validated unit vectors
//! - **Vector Cache**: Fingerprint-keyed persistence across restarts
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Catalog System                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  services.json ──► ServiceRecord ──► CatalogItem                │
//! │                                          │                      │
//! │                                    TextProjection               │
//! │                                          │                      │
//! │                                          ▼                      │
//! │  VectorCache ◄───────────────────► CatalogStore                 │
//! │  (fingerprint keyed)               (items, aligned vectors)     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A store never changes after construction. Catalog updates build a new
//! store, which the retrieval layer swaps in atomically.

pub mod cache;
pub mod error;
pub mod item;
pub mod projection;
pub mod source;
pub mod store;

pub use cache::VectorCache;
pub use error::{CatalogError, Result};
pub use item::{CatalogItem, ServiceId};
pub use projection::TextProjection;
pub use source::{CatalogLocale, ServiceRecord, from_records, load_items};
pub use store::{BuildOptions, CatalogStore, fingerprint};
