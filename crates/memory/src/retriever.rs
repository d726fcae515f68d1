//! The Retrieval Filter — similarity-filtered narrowing of a document
//! store.
//!
//! Binds an [`Embedder`] to a [`VectorStore`] and carries the default
//! top-k / similarity-floor parameters. For a fixed store and embedder
//! the results are deterministic; "nothing cleared the floor" is an
//! empty result, not an error.

use redraft_core::error::RetrievalError;
use redraft_core::retrieval::{Document, Embedder, ScoredDocument, VectorStore};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// A retrieval filter over a vector store.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    top_k: usize,
    min_score: f32,
}

impl Retriever {
    /// Create a retriever with explicit defaults.
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        top_k: usize,
        min_score: f32,
    ) -> Self {
        Self {
            embedder,
            store,
            top_k,
            min_score,
        }
    }

    /// Embed `text` and ingest it as a new document. Returns the id.
    pub async fn ingest(&self, text: &str) -> Result<String, RetrievalError> {
        let embedding = self.embedder.embed(text).await?;
        let id = Uuid::new_v4().to_string();
        self.store
            .add(Document::new(id.clone(), text, embedding))
            .await?;
        debug!(document_id = %id, "Ingested document");
        Ok(id)
    }

    /// Query with the configured top-k and similarity floor.
    pub async fn query(&self, text: &str) -> Result<Vec<ScoredDocument>, RetrievalError> {
        self.query_with(text, self.top_k, self.min_score).await
    }

    /// Query with explicit parameters.
    pub async fn query_with(
        &self,
        text: &str,
        k: usize,
        min_score: f32,
    ) -> Result<Vec<ScoredDocument>, RetrievalError> {
        let embedding = self.embedder.embed(text).await?;
        let results = self.store.search(&embedding, k, min_score).await?;
        debug!(
            results = results.len(),
            k, min_score, "Retrieval query completed"
        );
        Ok(results)
    }

    /// The configured top-k.
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// The configured similarity floor.
    pub fn min_score(&self) -> f32 {
        self.min_score
    }
}
