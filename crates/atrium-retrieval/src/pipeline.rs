//! The retrieval pipeline
//!
//! Ties the chunker, embedder, index, and ReBAC engine together. The
//! authorization filter runs before any similarity math: an empty
//! readable set returns an empty answer without touching the index.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use atrium_const::{
    DEFAULT_SEARCH_LIMIT, READ_RELATION_ALIASES, SIMILARITY_THRESHOLD_AUTHORIZED,
    SIMILARITY_THRESHOLD_FALLBACK, SIMILARITY_THRESHOLD_UNSCOPED,
};
use atrium_rebac::RebacEngine;
use atrium_types::{EmbeddingRecord, Principal, ResourceType, SourceType};

use crate::chunk::TextChunker;
use crate::embed::Embedder;
use crate::index::{EmbeddingIndex, SearchHit};
use crate::normalize::normalize_dimension;
use crate::RetrievalResult;

/// Authorization-filtered semantic retrieval.
pub struct RetrievalPipeline {
    engine: Arc<RebacEngine>,
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn EmbeddingIndex>,
    chunker: Box<dyn TextChunker>,
}

impl RetrievalPipeline {
    pub fn new(
        engine: Arc<RebacEngine>,
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn EmbeddingIndex>,
        chunker: Box<dyn TextChunker>,
    ) -> Self {
        Self { engine, embedder, index, chunker }
    }

    /// Embed a query string: newlines flattened, vector normalized.
    pub async fn embed_query(&self, user: &Principal, text: &str) -> RetrievalResult<Vec<f32>> {
        let flattened = text.replace('\n', " ");
        let vector = self.embedder.embed(user, &flattened).await?;
        Ok(normalize_dimension(vector, "query"))
    }

    /// Chunk and embed a body of text, returning `(chunk, vector)` pairs.
    pub async fn embed_chunks(
        &self,
        user: &Principal,
        text: &str,
    ) -> RetrievalResult<Vec<(String, Vec<f32>)>> {
        let chunks = self.chunker.chunk(text);
        let vectors = self.embedder.embed_many(user, &chunks).await?;
        Ok(chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, vector)| {
                let normalized = normalize_dimension(vector, "chunk");
                (chunk, normalized)
            })
            .collect())
    }

    /// Chunk, embed, and store a document's content in the index.
    pub async fn index_document(
        &self,
        user: &Principal,
        document_id: &str,
        file_name: &str,
        text: &str,
    ) -> RetrievalResult<usize> {
        let pairs = self.embed_chunks(user, text).await?;
        let count = pairs.len();
        for (content, embedding) in pairs {
            self.index
                .insert(EmbeddingRecord::new(
                    Some(document_id.to_string()),
                    content,
                    file_name,
                    embedding,
                    SourceType::Document,
                ))
                .await;
        }
        info!(document_id, chunks = count, "indexed document content");
        Ok(count)
    }

    /// Document ids the user can read, probing the relation aliases in
    /// order and stopping at the first non-empty result.
    async fn authorized_document_ids(&self, user: &Principal) -> Vec<String> {
        for relation in READ_RELATION_ALIASES {
            let objects = self.engine.list_objects(user, ResourceType::Document, relation).await;
            if !objects.is_empty() {
                debug!(relation, count = objects.len(), "resolved readable document set");
                return objects.into_iter().map(|o| o.id).collect();
            }
        }
        Vec::new()
    }

    /// Search content readable by `user`, best matches first.
    ///
    /// Applies the threshold cascade: a strict first pass, then one retry
    /// at the fallback threshold when nothing qualifies. If the embedding
    /// call fails or times out the cascade is abandoned, not retried.
    #[instrument(skip(self, query), fields(query_chars = query.len()))]
    pub async fn search(
        &self,
        user: &Principal,
        query: &str,
        limit: Option<usize>,
    ) -> RetrievalResult<Vec<SearchHit>> {
        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT);

        let authorized = self.authorized_document_ids(user).await;
        if authorized.is_empty() {
            // never fall back to an unfiltered search
            info!(user = %user, "no readable documents, returning empty result");
            return Ok(Vec::new());
        }

        let query_vector = self.embed_query(user, query).await?;
        let hits = self
            .index
            .top_k(
                &query_vector,
                Some(&authorized),
                SIMILARITY_THRESHOLD_AUTHORIZED,
                limit,
            )
            .await;
        if !hits.is_empty() {
            return Ok(hits);
        }

        debug!("no matches at strict threshold, retrying at fallback");
        Ok(self
            .index
            .top_k(
                &query_vector,
                Some(&authorized),
                SIMILARITY_THRESHOLD_FALLBACK,
                limit,
            )
            .await)
    }

    /// Unscoped search for internal tooling. Stricter first pass, same
    /// single fallback retry. Not reachable from user-facing handlers.
    pub async fn search_unscoped(
        &self,
        user: &Principal,
        query: &str,
        limit: Option<usize>,
    ) -> RetrievalResult<Vec<SearchHit>> {
        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        let query_vector = self.embed_query(user, query).await?;
        let hits = self
            .index
            .top_k(&query_vector, None, SIMILARITY_THRESHOLD_UNSCOPED, limit)
            .await;
        if !hits.is_empty() {
            return Ok(hits);
        }
        Ok(self
            .index
            .top_k(&query_vector, None, SIMILARITY_THRESHOLD_FALLBACK, limit)
            .await)
    }
}
