//! Retrieval traits — embeddings and vector search at the boundary.
//!
//! The core treats the vector store as an opaque append/query service and
//! the embedder as a pure text-to-vector function. A query that clears
//! nothing above the similarity floor returns an empty result, which is a
//! valid outcome for callers, not an error.

use crate::error::RetrievalError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A stored document with its embedding.
///
/// Created once at ingestion time; immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Opaque identifier
    pub id: String,

    /// The document text
    pub text: String,

    /// Embedding vector (dimensionality fixed by the embedding model)
    pub embedding: Vec<f32>,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            embedding,
        }
    }
}

/// A document paired with its similarity score for one query.
///
/// Derived per query, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f32,
}

/// Text-to-vector embedding capability.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a text into a fixed-dimensionality vector.
    async fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, RetrievalError>;
}

/// The vector store boundary: append documents, query by similarity.
///
/// `search` returns at most `k` results with `score >= min_score`, sorted
/// descending by score; ties keep insertion order.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// The backend name (e.g., "in_memory").
    fn name(&self) -> &str;

    /// Ingest a document.
    async fn add(&self, document: Document) -> std::result::Result<(), RetrievalError>;

    /// Query by embedding.
    async fn search(
        &self,
        embedding: &[f32],
        k: usize,
        min_score: f32,
    ) -> std::result::Result<Vec<ScoredDocument>, RetrievalError>;

    /// Number of stored documents.
    async fn count(&self) -> std::result::Result<usize, RetrievalError>;
}
