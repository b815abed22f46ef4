//! Integration tests for the service matching pipeline.
//!
//! This suite drives the full path from portal service records to ranked
//! matches: source parsing, catalog embedding, vector caching, and query
//! retrieval against both stub and HTTP embedders.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use setu_catalog::{
    BuildOptions, CatalogItem, CatalogLocale, ServiceRecord, TextProjection, VectorCache,
    from_records,
};
use setu_embeddings::{EmbedRole, Embedder, Embedding, EmbeddingError, HttpEmbedder};
use setu_retrieval::{MatcherConfig, Selection, ServiceMatcher};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Embedder backed by a fixed text-to-vector table.
struct TableEmbedder {
    dimension: usize,
    table: HashMap<String, Embedding>,
    calls: AtomicUsize,
}

impl TableEmbedder {
    fn new(dimension: usize, table: HashMap<String, Embedding>) -> Self {
        Self {
            dimension,
            table,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for TableEmbedder {
    fn model(&self) -> &str {
        "table-test-model"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(
        &self,
        texts: &[String],
        _role: EmbedRole,
    ) -> setu_embeddings::Result<Vec<Embedding>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        texts
            .iter()
            .map(|text| {
                self.table
                    .get(text)
                    .cloned()
                    .ok_or_else(|| EmbeddingError::Encoding(format!("unknown text: {text}")))
            })
            .collect()
    }
}

/// Build a table embedder whose keys are the projected passage texts of
/// `items` plus the given queries.
fn table_embedder(
    items: &[CatalogItem],
    passage_vectors: &[Embedding],
    queries: &[(&str, Embedding)],
) -> Arc<TableEmbedder> {
    let projection = TextProjection::default();
    let mut table: HashMap<String, Embedding> = items
        .iter()
        .zip(passage_vectors)
        .map(|(item, vector)| (projection.project(item), vector.clone()))
        .collect();
    for (query, vector) in queries {
        table.insert(query.to_string(), vector.clone());
    }

    let dimension = passage_vectors[0].len();
    Arc::new(TableEmbedder::new(dimension, table))
}

/// The portal records the original prototype was written against.
fn portal_records() -> Vec<ServiceRecord> {
    serde_json::from_str(
        r#"[
            {
                "serviceId": "SVC-CTZ",
                "name": "Citizenship Certificate",
                "nameNepali": "नागरिकता प्रमाणपत्र",
                "description": "Certificate of citizenship issued by the District Administration Office",
                "descriptionNepali": "नागरिकता प्रमाणपत्र जारी गर्ने सेवा"
            },
            {
                "serviceId": "SVC-PPT",
                "name": "Passport",
                "nameNepali": "राहदानी",
                "description": "Government passport issuance service",
                "descriptionNepali": "राहदानी (पासपोर्ट) बनाउने सरकारी सेवा"
            },
            {
                "serviceId": "SVC-PAN",
                "name": "PAN Registration",
                "nameNepali": "स्थायी लेखा नम्बर दर्ता",
                "description": "Permanent account number registration",
                "descriptionNepali": "स्थायी लेखा नम्बर (PAN) दर्ता सेवा"
            }
        ]"#,
    )
    .unwrap()
}

#[tokio::test]
async fn test_nepali_query_matches_citizenship_service() {
    let items = from_records(portal_records(), CatalogLocale::Nepali);
    assert_eq!(items[0].name, "नागरिकता प्रमाणपत्र");

    let query = "नागरिकता बनाउन के चाहिन्छ";
    let embedder = table_embedder(
        &items,
        &[
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ],
        &[(query, vec![0.8, 0.6, 0.0])],
    );

    let matcher = ServiceMatcher::build(embedder, items, MatcherConfig::default())
        .await
        .unwrap();

    let result = matcher.retrieve(query).await.unwrap();
    let best = result.top().unwrap();

    println!("Best match: {} (score {})", best.item.name, best.score);

    assert_eq!(best.item.id.as_str(), "SVC-CTZ");
    assert!((best.score - 0.8).abs() < 1e-6);
    assert_eq!(result.len(), 3, "Default selection should rank everything");
    assert_eq!(result.matches[1].item.id.as_str(), "SVC-PPT");
}

#[tokio::test]
async fn test_selection_modes_over_one_catalog() {
    let items = from_records(portal_records(), CatalogLocale::English);
    let query = "how do I renew my passport";
    let embedder = table_embedder(
        &items,
        &[
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ],
        &[(query, vec![0.28, 0.96, 0.0])],
    );

    let matcher = ServiceMatcher::build(embedder, items, MatcherConfig::default())
        .await
        .unwrap();

    let top_one = matcher
        .retrieve_with(query, &Selection::TopK(1))
        .await
        .unwrap();
    assert_eq!(top_one.len(), 1);
    assert_eq!(top_one.top().unwrap().item.id.as_str(), "SVC-PPT");

    let confident = matcher
        .retrieve_with(query, &Selection::Threshold { min_score: 0.9 })
        .await
        .unwrap();
    assert_eq!(confident.len(), 1, "Only the passport service scores 0.9+");

    let capped = matcher
        .retrieve_with(
            query,
            &Selection::ThresholdCapped {
                min_score: 0.2,
                limit: 1,
            },
        )
        .await
        .unwrap();
    assert_eq!(capped.len(), 1);
    assert_eq!(capped.top().unwrap().item.id.as_str(), "SVC-PPT");
}

#[tokio::test]
async fn test_http_embedder_end_to_end() {
    let server = MockServer::start().await;
    let items = from_records(portal_records(), CatalogLocale::English);
    let projection = TextProjection::default();

    let passage_inputs: Vec<String> = items
        .iter()
        .map(|item| EmbedRole::Passage.tag(&projection.project(item)))
        .collect();
    Mock::given(method("POST"))
        .and(path("/embed"))
        .and(body_partial_json(
            serde_json::json!({ "inputs": passage_inputs }),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let query = "how do I renew my passport";
    Mock::given(method("POST"))
        .and(path("/embed"))
        .and(body_partial_json(
            serde_json::json!({ "inputs": [EmbedRole::Query.tag(query)] }),
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([[0.28, 0.96, 0.0]])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let embedder = Arc::new(HttpEmbedder::new(server.uri()).with_dimension(3));
    let matcher = ServiceMatcher::build(embedder, items, MatcherConfig::default())
        .await
        .unwrap();

    let result = matcher.retrieve(query).await.unwrap();

    assert_eq!(result.top().unwrap().item.id.as_str(), "SVC-PPT");
    assert!((result.top().unwrap().score - 0.96).abs() < 1e-6);
    assert_eq!(result.matches[1].item.id.as_str(), "SVC-CTZ");
}

#[tokio::test]
async fn test_vector_cache_survives_restart() {
    let dir = tempfile::TempDir::new().unwrap();
    let cache_path = dir.path().join("vectors.json");
    let items = from_records(portal_records(), CatalogLocale::English);
    let query = "how do I renew my passport";
    let embedder = table_embedder(
        &items,
        &[
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ],
        &[(query, vec![0.28, 0.96, 0.0])],
    );
    let options = BuildOptions::default();

    // First process: build through the embedder and persist.
    let store = VectorCache::new(&cache_path)
        .load_or_build(items.clone(), embedder.as_ref(), &options)
        .await
        .unwrap();
    assert_eq!(embedder.calls(), 1);

    let matcher = ServiceMatcher::with_config(embedder.clone(), store, MatcherConfig::default());
    let first = matcher.retrieve(query).await.unwrap();
    assert_eq!(embedder.calls(), 2, "Query embedding is never cached");

    // Second process: catalog vectors come from disk, only the query
    // goes to the embedder.
    let store = VectorCache::new(&cache_path)
        .load_or_build(items, embedder.as_ref(), &options)
        .await
        .unwrap();
    assert_eq!(embedder.calls(), 2);

    let matcher = ServiceMatcher::with_config(embedder.clone(), store, MatcherConfig::default());
    let second = matcher.retrieve(query).await.unwrap();
    assert_eq!(embedder.calls(), 3);

    assert_eq!(first, second, "Restart must not change ranking");
}

#[tokio::test]
async fn test_rebuild_keeps_old_snapshots_intact() {
    let items = from_records(portal_records(), CatalogLocale::English);
    let query = "tax number";

    let mut all_items = items.clone();
    all_items.push(CatalogItem::new(
        "SVC-VOTE",
        "Voter ID",
        "Voter identification card registration",
    ));

    let embedder = table_embedder(
        &all_items,
        &[
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![0.5, 0.5, 0.70710678],
        ],
        &[(query, vec![0.0, 0.0, 1.0])],
    );

    let matcher = ServiceMatcher::build(embedder, items, MatcherConfig::default())
        .await
        .unwrap();

    let snapshot = matcher.snapshot().await;
    assert_eq!(snapshot.size(), 3);

    matcher.rebuild(all_items).await.unwrap();

    assert_eq!(snapshot.size(), 3, "Old snapshot must be untouched");
    assert_eq!(matcher.stats().await.services, 4);

    let result = matcher.retrieve(query).await.unwrap();
    assert_eq!(result.top().unwrap().item.id.as_str(), "SVC-PAN");
    assert_eq!(result.len(), 4);
}
