//! Embedding generation
//!
//! The embedder resolves the user's provider per call, so a user who
//! rotates keys changes providers without a restart. Requests run under a
//! deadline; a timed-out call surfaces as [`RetrievalError::Timeout`] so
//! the search cascade can abandon its retry.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use atrium_provider::{embedding_model, ProviderResolver, ResolvedProvider};
use atrium_types::{Principal, Provider};

use crate::{RetrievalError, RetrievalResult};

/// Generates embedding vectors for a user's text.
///
/// Returned vectors are raw provider output; the pipeline normalizes
/// dimensionality.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, user: &Principal, text: &str) -> RetrievalResult<Vec<f32>>;

    async fn embed_many(
        &self,
        user: &Principal,
        texts: &[String],
    ) -> RetrievalResult<Vec<Vec<f32>>>;
}

/// HTTP embedder over the resolved provider's embedding API.
pub struct HttpEmbedder {
    client: reqwest::Client,
    resolver: Arc<ProviderResolver>,
    timeout: Duration,
    /// Overridable for tests; defaults to the public endpoints.
    openai_base: String,
    google_base: String,
}

impl HttpEmbedder {
    pub fn new(resolver: Arc<ProviderResolver>, timeout: Duration) -> RetrievalResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RetrievalError::Embedding(e.to_string()))?;
        Ok(Self {
            client,
            resolver,
            timeout,
            openai_base: "https://api.openai.com/v1".to_string(),
            google_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        })
    }

    pub fn with_endpoints(
        mut self,
        openai_base: impl Into<String>,
        google_base: impl Into<String>,
    ) -> Self {
        self.openai_base = openai_base.into();
        self.google_base = google_base.into();
        self
    }

    async fn embed_batch(
        &self,
        resolved: &ResolvedProvider,
        texts: &[String],
    ) -> RetrievalResult<Vec<Vec<f32>>> {
        let model = embedding_model(resolved.provider);
        debug!(provider = %resolved.provider, model, count = texts.len(), "generating embeddings");
        match resolved.provider {
            // Groq serves no embeddings; its keys go through the
            // OpenAI-compatible endpoint with the standard small model.
            Provider::OpenAi | Provider::Groq => {
                self.embed_openai(resolved, model, texts).await
            }
            Provider::Google => self.embed_google(resolved, model, texts).await,
        }
    }

    async fn embed_openai(
        &self,
        resolved: &ResolvedProvider,
        model: &str,
        texts: &[String],
    ) -> RetrievalResult<Vec<Vec<f32>>> {
        let body = OpenAiEmbeddingRequest { model, input: texts };
        let response = self
            .client
            .post(format!("{}/embeddings", self.openai_base))
            .bearer_auth(resolved.api_key.as_str())
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(RetrievalError::Embedding(format!("{status}: {text}")));
        }
        let reply: OpenAiEmbeddingResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::Embedding(format!("malformed response: {e}")))?;

        let mut data = reply.data;
        data.sort_by_key(|d| d.index);
        Ok(data.into_iter().map(|d| d.embedding).collect())
    }

    async fn embed_google(
        &self,
        resolved: &ResolvedProvider,
        model: &str,
        texts: &[String],
    ) -> RetrievalResult<Vec<Vec<f32>>> {
        let requests: Vec<GoogleEmbedEntry<'_>> = texts
            .iter()
            .map(|text| GoogleEmbedEntry {
                model: format!("models/{model}"),
                content: GoogleContent { parts: vec![GooglePart { text }] },
            })
            .collect();
        let response = self
            .client
            .post(format!(
                "{}/models/{model}:batchEmbedContents",
                self.google_base
            ))
            .query(&[("key", resolved.api_key.as_str())])
            .json(&GoogleEmbedRequest { requests })
            .timeout(self.timeout)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(RetrievalError::Embedding(format!("{status}: {text}")));
        }
        let reply: GoogleEmbedResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::Embedding(format!("malformed response: {e}")))?;
        Ok(reply.embeddings.into_iter().map(|e| e.values).collect())
    }
}

fn map_request_error(err: reqwest::Error) -> RetrievalError {
    if err.is_timeout() {
        RetrievalError::Timeout
    } else {
        RetrievalError::Embedding(err.to_string())
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, user: &Principal, text: &str) -> RetrievalResult<Vec<f32>> {
        let resolved = self.resolver.resolve(user).await?;
        let mut vectors = self.embed_batch(&resolved, &[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| RetrievalError::Embedding("provider returned no vectors".into()))
    }

    async fn embed_many(
        &self,
        user: &Principal,
        texts: &[String],
    ) -> RetrievalResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let resolved = self.resolver.resolve(user).await?;
        let vectors = self.embed_batch(&resolved, texts).await?;
        if vectors.len() != texts.len() {
            return Err(RetrievalError::Embedding(format!(
                "provider returned {} vectors for {} inputs",
                vectors.len(),
                texts.len()
            )));
        }
        Ok(vectors)
    }
}

#[derive(Serialize)]
struct OpenAiEmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct OpenAiEmbeddingDatum {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct OpenAiEmbeddingResponse {
    data: Vec<OpenAiEmbeddingDatum>,
}

#[derive(Serialize)]
struct GooglePart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GoogleContent<'a> {
    parts: Vec<GooglePart<'a>>,
}

#[derive(Serialize)]
struct GoogleEmbedEntry<'a> {
    model: String,
    content: GoogleContent<'a>,
}

#[derive(Serialize)]
struct GoogleEmbedRequest<'a> {
    requests: Vec<GoogleEmbedEntry<'a>>,
}

#[derive(Deserialize)]
struct GoogleEmbedding {
    values: Vec<f32>,
}

#[derive(Deserialize)]
struct GoogleEmbedResponse {
    embeddings: Vec<GoogleEmbedding>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_request_shape() {
        let input = vec!["hello".to_string()];
        let body = OpenAiEmbeddingRequest { model: "text-embedding-3-small", input: &input };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "text-embedding-3-small");
        assert_eq!(json["input"][0], "hello");
    }

    #[test]
    fn test_openai_response_reordered_by_index() {
        let raw = r#"{"data":[{"index":1,"embedding":[2.0]},{"index":0,"embedding":[1.0]}]}"#;
        let mut reply: OpenAiEmbeddingResponse = serde_json::from_str(raw).unwrap();
        reply.data.sort_by_key(|d| d.index);
        assert_eq!(reply.data[0].embedding, vec![1.0]);
    }

    #[test]
    fn test_google_response_shape() {
        let raw = r#"{"embeddings":[{"values":[0.1,0.2]}]}"#;
        let reply: GoogleEmbedResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(reply.embeddings[0].values.len(), 2);
    }
}
