//! Configuration loading, validation, and management for redraft.
//!
//! Loads configuration from `~/.redraft/config.toml` with environment
//! variable overrides. Validates all settings at load time, before any
//! network call is made. The original system wired credentials and
//! clients as process-wide globals in each demo's `main`; here everything
//! is carried in one injected [`AppConfig`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.redraft/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Language-model provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Web search backend settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Message window settings
    #[serde(default)]
    pub window: WindowConfig,

    /// Retrieval filter settings
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Review workflow settings
    #[serde(default)]
    pub workflow: WorkflowConfig,

    /// Role defaults
    #[serde(default)]
    pub roles: RolesConfig,
}

/// Language-model provider configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key (env override: REDRAFT_API_KEY, then GEMINI_API_KEY)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Provider name for logging
    #[serde(default = "default_provider_name")]
    pub name: String,

    /// OpenAI-compatible base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Chat model
    #[serde(default = "default_model")]
    pub model: String,

    /// Embedding model
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Default max tokens per response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

/// Web search backend configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// API key (env override: TAVILY_API_KEY)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Search API base URL
    #[serde(default = "default_search_base_url")]
    pub base_url: String,

    /// Maximum results per search
    #[serde(default = "default_search_max_results")]
    pub max_results: usize,
}

/// Message window configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Maximum messages held
    #[serde(default = "default_window_capacity")]
    pub capacity: usize,

    /// Whether the leading system message is exempt from eviction
    #[serde(default = "default_true")]
    pub pin_system: bool,
}

/// Retrieval filter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of nearest documents to return
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Similarity floor; results below it are dropped
    #[serde(default = "default_min_score")]
    pub min_score: f32,
}

/// Review workflow configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Token whose presence in review feedback approves the draft
    #[serde(default = "default_approval_token")]
    pub approval_token: String,

    /// Maximum refinement passes before terminating unapproved
    #[serde(default = "default_max_refinements")]
    pub max_refinements: u32,
}

/// Role defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolesConfig {
    /// Default sampling temperature (0.0 = deterministic)
    #[serde(default)]
    pub temperature: f32,

    /// Maximum tool-call depth per invocation
    #[serde(default = "default_max_tool_depth")]
    pub max_tool_depth: u32,
}

fn default_provider_name() -> String {
    "gemini".into()
}
fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/openai".into()
}
fn default_model() -> String {
    "gemini-flash-latest".into()
}
fn default_embedding_model() -> String {
    "text-embedding-004".into()
}
fn default_max_tokens() -> u32 {
    4096
}
fn default_search_base_url() -> String {
    "https://api.tavily.com".into()
}
fn default_search_max_results() -> usize {
    5
}
fn default_window_capacity() -> usize {
    10
}
fn default_top_k() -> usize {
    2
}
fn default_min_score() -> f32 {
    0.7
}
fn default_approval_token() -> String {
    "APPROVED".into()
}
fn default_max_refinements() -> u32 {
    1
}
fn default_max_tool_depth() -> u32 {
    5
}
fn default_true() -> bool {
    true
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("embedding_model", &self.embedding_model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("max_results", &self.max_results)
            .finish()
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("provider", &self.provider)
            .field("search", &self.search)
            .field("window", &self.window)
            .field("retrieval", &self.retrieval)
            .field("workflow", &self.workflow)
            .field("roles", &self.roles)
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            name: default_provider_name(),
            base_url: default_base_url(),
            model: default_model(),
            embedding_model: default_embedding_model(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_search_base_url(),
            max_results: default_search_max_results(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            capacity: default_window_capacity(),
            pin_system: true,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            min_score: default_min_score(),
        }
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            approval_token: default_approval_token(),
            max_refinements: default_max_refinements(),
        }
    }
}

impl Default for RolesConfig {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            max_tool_depth: default_max_tool_depth(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            search: SearchConfig::default(),
            window: WindowConfig::default(),
            retrieval: RetrievalConfig::default(),
            workflow: WorkflowConfig::default(),
            roles: RolesConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location with env overrides.
    ///
    /// Environment variables:
    /// - `REDRAFT_API_KEY` / `GEMINI_API_KEY` — model provider key
    /// - `TAVILY_API_KEY` — search backend key
    /// - `REDRAFT_MODEL` — chat model override
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if config.provider.api_key.is_none() {
            config.provider.api_key = std::env::var("REDRAFT_API_KEY")
                .ok()
                .or_else(|| std::env::var("GEMINI_API_KEY").ok());
        }

        if config.search.api_key.is_none() {
            config.search.api_key = std::env::var("TAVILY_API_KEY").ok();
        }

        if let Ok(model) = std::env::var("REDRAFT_MODEL") {
            config.provider.model = model;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".redraft")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.roles.temperature) {
            return Err(ConfigError::Validation(
                "roles.temperature must be between 0.0 and 1.0".into(),
            ));
        }

        if self.window.capacity == 0 {
            return Err(ConfigError::Validation(
                "window.capacity must be at least 1".into(),
            ));
        }

        if self.retrieval.top_k == 0 {
            return Err(ConfigError::Validation(
                "retrieval.top_k must be at least 1".into(),
            ));
        }

        if !(-1.0..=1.0).contains(&self.retrieval.min_score) {
            return Err(ConfigError::Validation(
                "retrieval.min_score must be between -1.0 and 1.0".into(),
            ));
        }

        if self.roles.max_tool_depth == 0 {
            return Err(ConfigError::Validation(
                "roles.max_tool_depth must be at least 1".into(),
            ));
        }

        if self.workflow.approval_token.trim().is_empty() {
            return Err(ConfigError::Validation(
                "workflow.approval_token must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Fail early when the model provider has no credential.
    ///
    /// Surfaced before any network call (the workflow controller never
    /// starts a run against an unconfigured provider).
    pub fn require_provider_key(&self) -> Result<&str, ConfigError> {
        self.provider.api_key.as_deref().ok_or_else(|| {
            ConfigError::Validation(
                "no provider API key: set REDRAFT_API_KEY or GEMINI_API_KEY, \
                 or provider.api_key in config.toml"
                    .into(),
            )
        })
    }

    /// Fail early when the search backend has no credential.
    pub fn require_search_key(&self) -> Result<&str, ConfigError> {
        self.search.api_key.as_deref().ok_or_else(|| {
            ConfigError::Validation(
                "no search API key: set TAVILY_API_KEY or search.api_key in config.toml".into(),
            )
        })
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    Validation(String),
}
