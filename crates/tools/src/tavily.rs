//! Tavily search backend — HTTP client for the Tavily search API.

use async_trait::async_trait;
use redraft_core::error::ToolError;
use redraft_config::SearchConfig;
use serde::Deserialize;
use tracing::debug;

use crate::search::{SearchHit, WebSearchBackend};

/// A [`WebSearchBackend`] over the Tavily HTTP API.
#[derive(Debug)]
pub struct TavilySearch {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl TavilySearch {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, ToolError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "searchWeb".into(),
                reason: format!("HTTP client: {e}"),
            })?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Create a backend from configuration. Fails before any network call
    /// when no API key is configured.
    pub fn from_config(config: &SearchConfig) -> Result<Self, ToolError> {
        let api_key = config.api_key.as_deref().ok_or_else(|| {
            ToolError::ExecutionFailed {
                tool_name: "searchWeb".into(),
                reason: "missing search API key".into(),
            }
        })?;
        Self::new(&config.base_url, api_key)
    }
}

#[async_trait]
impl WebSearchBackend for TavilySearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, ToolError> {
        let url = format!("{}/search", self.base_url);
        let body = serde_json::json!({
            "api_key": self.api_key,
            "query": query,
            "max_results": max_results,
        });

        debug!(query, max_results, "Sending search request");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "searchWeb".into(),
                reason: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ToolError::ExecutionFailed {
                tool_name: "searchWeb".into(),
                reason: format!("status {status}: {error_body}"),
            });
        }

        let parsed: TavilyResponse =
            response
                .json()
                .await
                .map_err(|e| ToolError::ExecutionFailed {
                    tool_name: "searchWeb".into(),
                    reason: format!("malformed response: {e}"),
                })?;

        Ok(parsed
            .results
            .into_iter()
            .map(|r| SearchHit {
                title: r.title,
                url: r.url,
                snippet: r.content,
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    title: String,
    url: String,
    #[serde(default)]
    content: String,
}
