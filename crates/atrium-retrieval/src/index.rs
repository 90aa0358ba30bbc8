//! Embedding index
//!
//! Similarity search over stored embedding records. The durable
//! implementation (pgvector or similar) belongs to the storage
//! collaborator; the in-memory index here backs tests and development and
//! defines the contract.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use atrium_types::EmbeddingRecord;

use crate::similarity::cosine_similarity;

/// One search result row.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub content: String,
    pub score: f32,
    pub document_id: Option<String>,
}

/// Similarity search over embedding records.
#[async_trait]
pub trait EmbeddingIndex: Send + Sync {
    /// Store a record. The vector must already be normalized.
    async fn insert(&self, record: EmbeddingRecord);

    /// Top matches above `threshold`, best first.
    ///
    /// When `document_filter` is `Some`, only records whose
    /// `document_id` is in the given set are candidates; records without
    /// a document id never match a filtered query.
    async fn top_k(
        &self,
        query: &[f32],
        document_filter: Option<&[String]>,
        threshold: f32,
        limit: usize,
    ) -> Vec<SearchHit>;

    /// Drop all records owned by a document. Called by the storage
    /// collaborator's cascade on document deletion.
    async fn remove_by_document(&self, document_id: &str);
}

/// In-memory embedding index.
#[derive(Default)]
pub struct MemoryEmbeddingIndex {
    records: Arc<RwLock<Vec<EmbeddingRecord>>>,
}

impl MemoryEmbeddingIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl EmbeddingIndex for MemoryEmbeddingIndex {
    async fn insert(&self, record: EmbeddingRecord) {
        self.records.write().await.push(record);
    }

    async fn top_k(
        &self,
        query: &[f32],
        document_filter: Option<&[String]>,
        threshold: f32,
        limit: usize,
    ) -> Vec<SearchHit> {
        let records = self.records.read().await;
        let mut hits: Vec<SearchHit> = records
            .iter()
            .filter(|r| match document_filter {
                Some(allowed) => r
                    .document_id
                    .as_ref()
                    .is_some_and(|id| allowed.iter().any(|a| a == id)),
                None => true,
            })
            .filter_map(|r| {
                let score = cosine_similarity(query, &r.embedding);
                (score > threshold).then(|| SearchHit {
                    content: r.content.clone(),
                    score,
                    document_id: r.document_id.clone(),
                })
            })
            .collect();
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(limit);
        hits
    }

    async fn remove_by_document(&self, document_id: &str) {
        self.records
            .write()
            .await
            .retain(|r| r.document_id.as_deref() != Some(document_id));
    }
}
