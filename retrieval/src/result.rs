//! Query result types.

use serde::{Deserialize, Serialize};
use setu_catalog::CatalogItem;

/// A catalog service matched to a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMatch {
    /// The matched service.
    pub item: CatalogItem,

    /// Cosine similarity of query and passage, in [-1.0, 1.0].
    pub score: f32,
}

impl ScoredMatch {
    /// Create a new scored match.
    pub fn new(item: CatalogItem, score: f32) -> Self {
        Self { item, score }
    }
}

/// Ranked matches for one query, best first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Matches in descending score order.
    pub matches: Vec<ScoredMatch>,
}

impl QueryResult {
    /// Create a result from ranked matches.
    pub fn new(matches: Vec<ScoredMatch>) -> Self {
        Self { matches }
    }

    /// A result with no matches.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The best match, if any.
    pub fn top(&self) -> Option<&ScoredMatch> {
        self.matches.first()
    }

    /// Number of matches.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Whether the result holds no matches.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Iterate over matches, best first.
    pub fn iter(&self) -> impl Iterator<Item = &ScoredMatch> {
        self.matches.iter()
    }
}

impl IntoIterator for QueryResult {
    type Item = ScoredMatch;
    type IntoIter = std::vec::IntoIter<ScoredMatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.into_iter()
    }
}
