//! In-process vector store — the reference `VectorStore` implementation.
//!
//! Documents live in a `Vec` behind an `RwLock`, preserving insertion
//! order. Search is a full scan with cosine scoring; the stable
//! descending sort keeps insertion order for equal scores.

use async_trait::async_trait;
use redraft_core::error::RetrievalError;
use redraft_core::retrieval::{Document, ScoredDocument, VectorStore};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::vector::cosine_similarity;

/// A vector store holding documents in process memory.
pub struct InMemoryVectorStore {
    documents: Arc<RwLock<Vec<Document>>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self {
            documents: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn add(&self, document: Document) -> Result<(), RetrievalError> {
        if document.embedding.is_empty() {
            return Err(RetrievalError::Store(format!(
                "document '{}' has an empty embedding",
                document.id
            )));
        }
        self.documents.write().await.push(document);
        Ok(())
    }

    async fn search(
        &self,
        embedding: &[f32],
        k: usize,
        min_score: f32,
    ) -> Result<Vec<ScoredDocument>, RetrievalError> {
        let documents = self.documents.read().await;

        let mut scored: Vec<ScoredDocument> = documents
            .iter()
            .filter_map(|doc| {
                let score = cosine_similarity(&doc.embedding, embedding);
                (score >= min_score).then(|| ScoredDocument {
                    document: doc.clone(),
                    score,
                })
            })
            .collect();

        // Vec::sort_by is stable: equal scores keep insertion order.
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);

        Ok(scored)
    }

    async fn count(&self) -> Result<usize, RetrievalError> {
        Ok(self.documents.read().await.len())
    }
}
