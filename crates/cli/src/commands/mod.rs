//! CLI subcommands.

pub mod init;
pub mod models;
pub mod plan;
pub mod recall;
pub mod report;
pub mod research;

use anyhow::Context;
use redraft_config::AppConfig;
use redraft_providers::OpenAiCompatProvider;
use redraft_tools::TavilySearch;
use std::sync::Arc;

/// Load config and fail with a readable message when the model provider
/// has no credential — before any network call.
pub fn load_config_with_provider_key() -> anyhow::Result<AppConfig> {
    let config = AppConfig::load().context("Failed to load config")?;
    if let Err(e) = config.require_provider_key() {
        eprintln!();
        eprintln!("  ERROR: {e}");
        eprintln!();
        eprintln!("  Get a Gemini key at: https://aistudio.google.com/apikey");
        eprintln!();
        anyhow::bail!("No provider API key found");
    }
    Ok(config)
}

/// Build the model provider from config.
pub fn build_provider(config: &AppConfig) -> anyhow::Result<Arc<OpenAiCompatProvider>> {
    let provider = OpenAiCompatProvider::from_config(&config.provider)
        .context("Failed to build model provider")?;
    Ok(Arc::new(provider))
}

/// Build the web search backend from config, failing early when the
/// search key is missing.
pub fn build_search_backend(config: &AppConfig) -> anyhow::Result<Arc<TavilySearch>> {
    config
        .require_search_key()
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    let backend =
        TavilySearch::from_config(&config.search).context("Failed to build search backend")?;
    Ok(Arc::new(backend))
}
