//! Built-in tool implementations for redraft.
//!
//! Tools are what the model can request mid-response. The one shipped
//! here is `searchWeb`, backed by a pluggable [`WebSearchBackend`]
//! (Tavily over HTTP in production, a scripted stub in tests).

pub mod search;
pub mod tavily;
pub mod web_search;

pub use search::{SearchHit, WebSearchBackend};
pub use tavily::TavilySearch;
pub use web_search::WebSearchTool;

use redraft_core::tool::ToolRegistry;
use std::sync::Arc;

/// Create a tool registry exposing `searchWeb` over the given backend.
pub fn search_registry(backend: Arc<dyn WebSearchBackend>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(WebSearchTool::new(backend)));
    registry
}
