//! # redraft Core
//!
//! Domain types, traits, and error definitions for the redraft
//! role-orchestration runtime. This crate has **zero framework
//! dependencies** — it defines the domain model that all other crates
//! implement against.
//!
//! ## Design Philosophy
//!
//! Every external capability (model inference, embedding, vector search,
//! tool execution) is defined as a trait here. Implementations live in
//! their respective crates. This enables:
//! - Swapping backends via configuration
//! - Easy testing with scripted mock implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod event;
pub mod message;
pub mod provider;
pub mod retrieval;
pub mod template;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use event::{DomainEvent, EventBus};
pub use message::{Message, MessageWindow, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, ToolDefinition};
pub use retrieval::{Document, Embedder, ScoredDocument, VectorStore};
pub use template::PromptTemplate;
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult};
