//! # Atrium Retrieval - Authorization-Filtered Semantic Search
//!
//! Chunks text, generates embeddings through the user's resolved
//! provider, normalizes dimensionality, and runs similarity search
//! restricted to the querying user's readable document set. An empty
//! authorized set short-circuits to an empty answer; it never falls back
//! to an unfiltered search.

use thiserror::Error;

pub mod chunk;
pub mod embed;
pub mod index;
pub mod normalize;
pub mod pipeline;
pub mod similarity;

pub use chunk::{ParagraphChunker, TextChunker};
pub use embed::{Embedder, HttpEmbedder};
pub use index::{EmbeddingIndex, MemoryEmbeddingIndex, SearchHit};
pub use normalize::normalize_dimension;
pub use pipeline::RetrievalPipeline;

use atrium_provider::ProviderError;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The embedding provider rejected or failed the request.
    #[error("embedding request failed: {0}")]
    Embedding(String),

    /// The embedding call exceeded its deadline. A timed-out first pass
    /// abandons the threshold cascade rather than starting the retry.
    #[error("embedding request timed out")]
    Timeout,
}

pub type RetrievalResult<T> = std::result::Result<T, RetrievalError>;
