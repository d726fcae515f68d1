//! The web search boundary.

use async_trait::async_trait;
use redraft_core::error::ToolError;
use serde::{Deserialize, Serialize};

/// A single web search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// An external web search capability.
///
/// Returns hits ordered by the provider's own relevance ranking.
#[async_trait]
pub trait WebSearchBackend: Send + Sync {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> std::result::Result<Vec<SearchHit>, ToolError>;
}
