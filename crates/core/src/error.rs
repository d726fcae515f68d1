//! Error types for the redraft domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; all of them compose into
//! the top-level [`Error`]. Nothing here is recovered silently — a failed
//! role invocation surfaces to the workflow controller, which aborts the
//! current run.

use thiserror::Error;

/// The top-level error type for all redraft operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Template errors ---
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    // --- Retrieval errors ---
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    Api { status_code: u16, message: String },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

/// Prompt template resolution and binding failures.
///
/// Both variants are fatal to the single role invocation that raised them.
#[derive(Debug, Clone, Error)]
pub enum TemplateError {
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Unbound template slot '{{{{{slot}}}}}' in operation '{operation}'")]
    UnboundSlot { operation: String, slot: String },
}

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    Store(String),
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Tool execution failed: {tool_name} — {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),

    #[error("Tool call loop exceeded maximum depth of {max_depth}")]
    LoopExceeded { max_depth: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::Api {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn unbound_slot_names_slot_and_operation() {
        let err = Error::Template(TemplateError::UnboundSlot {
            operation: "refine".into(),
            slot: "feedback".into(),
        });
        assert!(err.to_string().contains("{{feedback}}"));
        assert!(err.to_string().contains("refine"));
    }

    #[test]
    fn loop_exceeded_reports_depth() {
        let err = Error::Tool(ToolError::LoopExceeded { max_depth: 5 });
        assert!(err.to_string().contains("5"));
    }
}
