//! Embedding record types
//!
//! One record per embedded chunk. Vectors are normalized to the target
//! dimensionality before they reach this type; the storage collaborator
//! owns cascade deletion when an owning document goes away.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a chunk of embedded content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Document,
    Note,
    MeetingTranscript,
    Integration,
}

impl Default for SourceType {
    fn default() -> Self {
        SourceType::Document
    }
}

/// An embedded chunk of text with its source metadata.
///
/// `document_id` is the owning-document reference; it is `None` for
/// content embedded from non-document sources (notes, transcripts).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    pub id: Uuid,
    pub document_id: Option<String>,
    pub content: String,
    pub file_name: String,
    pub embedding: Vec<f32>,
    pub source_type: SourceType,
    #[serde(default)]
    pub source_metadata: serde_json::Value,
}

impl EmbeddingRecord {
    pub fn new(
        document_id: Option<String>,
        content: impl Into<String>,
        file_name: impl Into<String>,
        embedding: Vec<f32>,
        source_type: SourceType,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            content: content.into(),
            file_name: file_name.into(),
            embedding,
            source_type,
            source_metadata: serde_json::Value::Null,
        }
    }
}
