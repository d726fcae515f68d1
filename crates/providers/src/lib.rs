//! Model provider implementations for redraft.
//!
//! All providers implement `redraft_core::Provider`; the OpenAI-compatible
//! adapter also implements `redraft_core::Embedder` through the
//! `/embeddings` endpoint.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;
