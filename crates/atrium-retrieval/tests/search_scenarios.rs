//! End-to-end search scenarios over the memory store and index.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use atrium_const::TARGET_DIM;
use atrium_rebac::{workspace_model, RebacEngine};
use atrium_retrieval::{
    Embedder, EmbeddingIndex, MemoryEmbeddingIndex, ParagraphChunker, RetrievalError,
    RetrievalPipeline,
};
use atrium_store::MemoryTupleStore;
use atrium_types::{EmbeddingRecord, ObjectRef, Principal, Relation, ResourceType, SourceType};

/// Embedder returning preset vectors by exact text, counting calls.
struct ScriptedEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    calls: AtomicUsize,
    fail: bool,
}

impl ScriptedEmbedder {
    fn new(vectors: HashMap<String, Vec<f32>>) -> Self {
        Self { vectors, calls: AtomicUsize::new(0), fail: false }
    }

    fn failing() -> Self {
        Self { vectors: HashMap::new(), calls: AtomicUsize::new(0), fail: true }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for ScriptedEmbedder {
    async fn embed(&self, _user: &Principal, text: &str) -> Result<Vec<f32>, RetrievalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RetrievalError::Timeout);
        }
        self.vectors
            .get(text)
            .cloned()
            .ok_or_else(|| RetrievalError::Embedding(format!("no scripted vector for '{text}'")))
    }

    async fn embed_many(
        &self,
        user: &Principal,
        texts: &[String],
    ) -> Result<Vec<Vec<f32>>, RetrievalError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(user, text).await?);
        }
        Ok(out)
    }
}

/// Unit vector along one axis.
fn axis(i: usize) -> Vec<f32> {
    let mut v = vec![0.0; TARGET_DIM];
    v[i] = 1.0;
    v
}

/// Vector whose cosine similarity with `axis(0)` is exactly `target`.
fn vector_with_similarity(target: f32) -> Vec<f32> {
    let mut v = vec![0.0; TARGET_DIM];
    v[0] = target;
    v[1] = (1.0 - target * target).sqrt();
    v
}

fn alice() -> Principal {
    Principal::new("alice@example.com")
}

fn bob() -> Principal {
    Principal::new("bob@example.com")
}

async fn engine() -> Arc<RebacEngine> {
    let store = Arc::new(MemoryTupleStore::with_model(workspace_model()).await);
    Arc::new(RebacEngine::new(store))
}

fn pipeline(
    engine: Arc<RebacEngine>,
    embedder: Arc<ScriptedEmbedder>,
    index: Arc<MemoryEmbeddingIndex>,
) -> RetrievalPipeline {
    RetrievalPipeline::new(engine, embedder, index, Box::new(ParagraphChunker::default()))
}

async fn insert(index: &MemoryEmbeddingIndex, document_id: &str, content: &str, vec: Vec<f32>) {
    index
        .insert(EmbeddingRecord::new(
            Some(document_id.to_string()),
            content,
            "source.md",
            vec,
            SourceType::Document,
        ))
        .await;
}

#[tokio::test]
async fn test_read_isolation_between_users() {
    let engine = engine().await;
    let doc_a = ObjectRef::new(ResourceType::Document, "d-alice");
    let doc_b = ObjectRef::new(ResourceType::Document, "d-bob");
    engine.grant(&alice(), &doc_a, Relation::Owner).await.unwrap();
    engine.grant(&bob(), &doc_b, Relation::Owner).await.unwrap();

    let index = Arc::new(MemoryEmbeddingIndex::new());
    // Alice's content is a perfect match for the query; Bob's is weaker.
    insert(&index, "d-alice", "alice quarterly revenue numbers", axis(0)).await;
    insert(&index, "d-bob", "bob meeting notes", vector_with_similarity(0.6)).await;

    let embedder = Arc::new(ScriptedEmbedder::new(HashMap::from([(
        "revenue numbers".to_string(),
        axis(0),
    )])));
    let pipeline = pipeline(engine, embedder, index);

    // Bob's query never returns Alice's content, even though it is the
    // top cosine match overall.
    let hits = pipeline.search(&bob(), "revenue numbers", None).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].document_id.as_deref(), Some("d-bob"));

    let hits = pipeline.search(&alice(), "revenue numbers", None).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].document_id.as_deref(), Some("d-alice"));
}

#[tokio::test]
async fn test_empty_authorized_set_short_circuits() {
    let engine = engine().await;
    let index = Arc::new(MemoryEmbeddingIndex::new());
    insert(&index, "d1", "some content", axis(0)).await;

    let embedder = Arc::new(ScriptedEmbedder::new(HashMap::new()));
    let pipeline = pipeline(engine, embedder.clone(), index);

    // bob can read nothing, so no embedding call is ever made
    let hits = pipeline.search(&bob(), "anything", None).await.unwrap();
    assert!(hits.is_empty());
    assert_eq!(embedder.call_count(), 0);
}

#[tokio::test]
async fn test_threshold_cascade_recovers_weak_match() {
    let engine = engine().await;
    let doc = ObjectRef::new(ResourceType::Document, "d1");
    engine.grant(&alice(), &doc, Relation::Owner).await.unwrap();

    let index = Arc::new(MemoryEmbeddingIndex::new());
    // best authorized match scores 0.25: below the 0.3 first pass,
    // above the 0.1 fallback
    insert(&index, "d1", "tangent content", vector_with_similarity(0.25)).await;

    let embedder = Arc::new(ScriptedEmbedder::new(HashMap::from([(
        "weak query".to_string(),
        axis(0),
    )])));
    let pipeline = pipeline(engine, embedder, index);

    let hits = pipeline.search(&alice(), "weak query", None).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert!((hits[0].score - 0.25).abs() < 1e-5);
}

#[tokio::test]
async fn test_strong_match_skips_fallback() {
    let engine = engine().await;
    let doc = ObjectRef::new(ResourceType::Document, "d1");
    engine.grant(&alice(), &doc, Relation::Owner).await.unwrap();

    let index = Arc::new(MemoryEmbeddingIndex::new());
    insert(&index, "d1", "strong", vector_with_similarity(0.9)).await;
    insert(&index, "d1", "weak", vector_with_similarity(0.15)).await;

    let embedder =
        Arc::new(ScriptedEmbedder::new(HashMap::from([("query".to_string(), axis(0))])));
    let pipeline = pipeline(engine, embedder, index);

    // the weak row would qualify at the fallback threshold, but a
    // non-empty first pass never cascades
    let hits = pipeline.search(&alice(), "query", None).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].content, "strong");
}

#[tokio::test]
async fn test_failed_embedding_abandons_cascade() {
    let engine = engine().await;
    let doc = ObjectRef::new(ResourceType::Document, "d1");
    engine.grant(&alice(), &doc, Relation::Owner).await.unwrap();

    let index = Arc::new(MemoryEmbeddingIndex::new());
    insert(&index, "d1", "content", axis(0)).await;

    let embedder = Arc::new(ScriptedEmbedder::failing());
    let pipeline = pipeline(engine, embedder.clone(), index);

    let err = pipeline.search(&alice(), "query", None).await.unwrap_err();
    assert!(matches!(err, RetrievalError::Timeout));
    // one embedding attempt, no retry
    assert_eq!(embedder.call_count(), 1);
}

#[tokio::test]
async fn test_search_respects_limit() {
    let engine = engine().await;
    let doc = ObjectRef::new(ResourceType::Document, "d1");
    engine.grant(&alice(), &doc, Relation::Owner).await.unwrap();

    let index = Arc::new(MemoryEmbeddingIndex::new());
    for i in 0..6 {
        insert(&index, "d1", &format!("chunk-{i}"), vector_with_similarity(0.9)).await;
    }

    let embedder =
        Arc::new(ScriptedEmbedder::new(HashMap::from([("query".to_string(), axis(0))])));
    let pipeline = pipeline(engine, embedder, index);

    let hits = pipeline.search(&alice(), "query", Some(2)).await.unwrap();
    assert_eq!(hits.len(), 2);
}

#[tokio::test]
async fn test_index_document_chunks_and_stores() {
    let engine = engine().await;
    let doc = ObjectRef::new(ResourceType::Document, "d1");
    engine.grant(&alice(), &doc, Relation::Owner).await.unwrap();

    let index = Arc::new(MemoryEmbeddingIndex::new());
    let text = "first paragraph\n\nsecond paragraph";
    let embedder = Arc::new(ScriptedEmbedder::new(HashMap::from([(
        text.to_string(),
        vec![0.5; 768], // undersized on purpose: must be padded
    )])));
    let pipeline = pipeline(engine, embedder, index.clone());

    let count = pipeline.index_document(&alice(), "d1", "notes.md", text).await.unwrap();
    assert_eq!(count, 1);

    let hits = index.top_k(&{
        let mut v = vec![0.5; 768];
        v.resize(TARGET_DIM, 0.0);
        v
    }, None, 0.5, 10)
    .await;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].document_id.as_deref(), Some("d1"));
}
