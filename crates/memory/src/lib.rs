//! Retrieval implementations for redraft.
//!
//! The [`InMemoryVectorStore`] keeps documents and embeddings in process;
//! the [`Retriever`] binds a store to an [`Embedder`](redraft_core::Embedder)
//! and applies the top-k / similarity-floor filter.

pub mod in_memory;
pub mod retriever;
pub mod vector;

pub use in_memory::InMemoryVectorStore;
pub use retriever::Retriever;
pub use vector::cosine_similarity;
