//! Ranking scored services.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use setu_catalog::{CatalogItem, CatalogStore};

use crate::result::{QueryResult, ScoredMatch};

/// How ranked matches are selected from the scored catalog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// The k highest-scoring services.
    TopK(usize),

    /// Every service scoring at least `min_score`.
    Threshold { min_score: f32 },

    /// Threshold filter first, then a result-count cap.
    ThresholdCapped { min_score: f32, limit: usize },
}

/// The `k` highest-scoring services, best first.
///
/// `k == 0` returns an empty result; `k` larger than the catalog returns
/// every service ranked.
pub fn top_k(scores: &[f32], store: &CatalogStore, k: usize) -> QueryResult {
    select(scores, store, f32::NEG_INFINITY, Some(k))
}

/// Every service scoring at least `min_score`, best first.
pub fn threshold(scores: &[f32], store: &CatalogStore, min_score: f32) -> QueryResult {
    select(scores, store, min_score, None)
}

/// Rank according to `selection`.
pub fn rank(scores: &[f32], store: &CatalogStore, selection: &Selection) -> QueryResult {
    match *selection {
        Selection::TopK(k) => top_k(scores, store, k),
        Selection::Threshold { min_score } => threshold(scores, store, min_score),
        Selection::ThresholdCapped { min_score, limit } => {
            select(scores, store, min_score, Some(limit))
        }
    }
}

/// Filter, sort descending, and cap.
///
/// `scores` must be the scorer's output for `store`, index-aligned. The
/// stable sort keeps equal scores in catalog order, so ties break
/// deterministically toward the earlier item.
fn select(
    scores: &[f32],
    store: &CatalogStore,
    min_score: f32,
    limit: Option<usize>,
) -> QueryResult {
    debug_assert_eq!(scores.len(), store.size());

    let mut ranked: Vec<(OrderedFloat<f32>, &CatalogItem)> = scores
        .iter()
        .zip(store.items())
        .filter(|(score, _)| **score >= min_score)
        .map(|(score, item)| (OrderedFloat(*score), item))
        .collect();

    // Sort by score descending
    ranked.sort_by(|a, b| b.0.cmp(&a.0));

    if let Some(limit) = limit {
        ranked.truncate(limit);
    }

    let matches = ranked
        .into_iter()
        .map(|(score, item)| ScoredMatch::new(item.clone(), score.0))
        .collect();

    QueryResult::new(matches)
}
