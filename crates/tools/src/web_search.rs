//! The `searchWeb` tool — exposes a [`WebSearchBackend`] to the model.
//!
//! The tool itself is passive: it runs only when the model's response
//! requests it, and its textual output is folded back into the model's
//! context by the invoking role.

use async_trait::async_trait;
use redraft_core::error::ToolError;
use redraft_core::tool::{Tool, ToolResult};
use std::sync::Arc;

use crate::search::WebSearchBackend;

/// Default number of results returned to the model.
const DEFAULT_RESULTS: usize = 3;

pub struct WebSearchTool {
    backend: Arc<dyn WebSearchBackend>,
}

impl WebSearchTool {
    pub fn new(backend: Arc<dyn WebSearchBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "searchWeb"
    }

    fn description(&self) -> &str {
        "Search the web for current information. Returns a list of relevant \
         results with titles, URLs, and snippets."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                },
                "max_results": {
                    "type": "integer",
                    "description": "Number of results to return (default 3)",
                    "default": DEFAULT_RESULTS
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let query = arguments["query"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'query' argument".into()))?;

        let max_results = arguments["max_results"]
            .as_u64()
            .map(|n| n as usize)
            .unwrap_or(DEFAULT_RESULTS)
            .clamp(1, 10);

        let hits = self.backend.search(query, max_results).await?;
        let output = serde_json::to_string_pretty(&hits).unwrap_or_default();

        Ok(ToolResult {
            call_id: String::new(),
            success: true,
            output,
        })
    }
}
