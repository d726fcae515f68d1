//! The Role implementation.

use redraft_core::error::{Error, TemplateError, ToolError};
use redraft_core::event::{DomainEvent, EventBus};
use redraft_core::message::{Message, MessageWindow};
use redraft_core::provider::{Provider, ProviderRequest};
use redraft_core::template::PromptTemplate;
use redraft_core::tool::{ToolCall, ToolRegistry};
use redraft_memory::Retriever;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Default bound on the tool-call loop within one invocation.
pub const DEFAULT_MAX_TOOL_DEPTH: u32 = 5;

/// A named operation: its template plus whether it wants retrieval.
struct OperationSpec {
    template: PromptTemplate,
    retrieve: bool,
}

/// A configured language-model persona.
///
/// Stateless across calls except through its bound memory window, which
/// is shared behind a mutex so concurrent runs that share a window
/// serialize their appends.
pub struct Role {
    name: String,
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    operations: HashMap<String, OperationSpec>,
    tools: Option<Arc<ToolRegistry>>,
    memory: Option<Arc<Mutex<MessageWindow>>>,
    retriever: Option<Arc<Retriever>>,
    max_tool_depth: u32,
    event_bus: Arc<EventBus>,
}

impl Role {
    /// Create a role with no operations bound yet.
    pub fn new(
        name: impl Into<String>,
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        temperature: f32,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            name: name.into(),
            provider,
            model: model.into(),
            temperature,
            max_tokens: None,
            operations: HashMap::new(),
            tools: None,
            memory: None,
            retriever: None,
            max_tool_depth: DEFAULT_MAX_TOOL_DEPTH,
            event_bus,
        }
    }

    /// Bind an operation.
    pub fn with_operation(mut self, name: impl Into<String>, template: PromptTemplate) -> Self {
        self.operations.insert(
            name.into(),
            OperationSpec {
                template,
                retrieve: false,
            },
        );
        self
    }

    /// Bind an operation that requests retrieved context.
    pub fn with_retrieving_operation(
        mut self,
        name: impl Into<String>,
        template: PromptTemplate,
    ) -> Self {
        self.operations.insert(
            name.into(),
            OperationSpec {
                template,
                retrieve: true,
            },
        );
        self
    }

    /// Bind a tool registry.
    pub fn with_tools(mut self, tools: Arc<ToolRegistry>) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Bind a (possibly shared) message window.
    pub fn with_memory(mut self, window: Arc<Mutex<MessageWindow>>) -> Self {
        self.memory = Some(window);
        self
    }

    /// Bind a retrieval filter.
    pub fn with_retriever(mut self, retriever: Arc<Retriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    /// Set the tool-call depth bound.
    pub fn with_max_tool_depth(mut self, depth: u32) -> Self {
        self.max_tool_depth = depth;
        self
    }

    /// Set the max tokens per model response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// The role's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke a named operation with the given slot bindings.
    ///
    /// Returns the model's final text. Any failure aborts the invocation
    /// without touching the bound window.
    pub async fn invoke(
        &self,
        operation: &str,
        bindings: &HashMap<String, String>,
    ) -> Result<String, Error> {
        let op = self
            .operations
            .get(operation)
            .ok_or_else(|| TemplateError::UnknownOperation(operation.to_string()))?;

        let rendered = op.template.render(operation, bindings)?;

        info!(role = %self.name, operation, "Invoking role operation");

        // ── Assemble context ──
        let mut system_content = rendered.system.clone();

        if op.retrieve
            && let Some(retriever) = &self.retriever
        {
            let results = retriever.query(&rendered.user).await?;
            self.event_bus.publish(DomainEvent::RetrievalPerformed {
                query_preview: preview(&rendered.user),
                results: results.len(),
                timestamp: chrono::Utc::now(),
            });
            // "No context" is a valid outcome: the block is simply omitted.
            if !results.is_empty() {
                system_content.push_str("\n\n## Retrieved Context\n");
                for (i, scored) in results.iter().enumerate() {
                    system_content.push_str(&format!(
                        "{}. [score={:.2}] {}\n",
                        i + 1,
                        scored.score,
                        scored.document.text
                    ));
                }
            }
        }

        let mut transcript: Vec<Message> = Vec::new();
        if !system_content.is_empty() {
            transcript.push(Message::system(&system_content));
        }
        if let Some(memory) = &self.memory {
            transcript.extend(memory.lock().await.snapshot());
        }
        transcript.push(Message::user(&rendered.user));

        // ── Model / tool loop ──
        let tool_definitions = self
            .tools
            .as_ref()
            .map(|t| t.definitions())
            .unwrap_or_default();
        let mut depth = 0u32;
        let mut tool_calls_made = 0usize;

        let final_text = loop {
            let request = ProviderRequest {
                model: self.model.clone(),
                messages: transcript.clone(),
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                tools: tool_definitions.clone(),
            };

            let response = self.provider.complete(request).await.map_err(Error::from)?;

            if response.message.tool_calls.is_empty() {
                break response.message.content;
            }

            depth += 1;
            if depth > self.max_tool_depth {
                warn!(
                    role = %self.name,
                    operation,
                    max_depth = self.max_tool_depth,
                    "Tool call loop exceeded"
                );
                return Err(ToolError::LoopExceeded {
                    max_depth: self.max_tool_depth,
                }
                .into());
            }

            let Some(tools) = &self.tools else {
                // The model asked for a tool no registry can serve.
                let name = response.message.tool_calls[0].name.clone();
                return Err(ToolError::NotFound(name).into());
            };

            debug!(
                role = %self.name,
                depth,
                tool_count = response.message.tool_calls.len(),
                "Executing tool calls"
            );

            let requested = response.message.tool_calls.clone();
            transcript.push(response.message);

            for tc in &requested {
                tool_calls_made += 1;
                let call = ToolCall {
                    id: tc.id.clone(),
                    name: tc.name.clone(),
                    arguments: serde_json::from_str(&tc.arguments).unwrap_or_default(),
                };

                let start = std::time::Instant::now();
                let result = tools.execute(&call).await;
                let duration_ms = start.elapsed().as_millis() as u64;

                match result {
                    Ok(tool_result) => {
                        self.event_bus.publish(DomainEvent::ToolExecuted {
                            tool_name: tc.name.clone(),
                            success: tool_result.success,
                            duration_ms,
                            timestamp: chrono::Utc::now(),
                        });
                        transcript.push(Message::tool_result(&tc.id, &tool_result.output));
                    }
                    Err(e) => {
                        // Recoverable only by the model's own next turn.
                        warn!(tool = %tc.name, error = %e, "Tool execution failed");
                        self.event_bus.publish(DomainEvent::ToolExecuted {
                            tool_name: tc.name.clone(),
                            success: false,
                            duration_ms,
                            timestamp: chrono::Utc::now(),
                        });
                        transcript.push(Message::tool_result(&tc.id, &format!("Error: {e}")));
                    }
                }
            }
        };

        // ── Record the turn (only after a fully successful invocation) ──
        if let Some(memory) = &self.memory {
            let mut window = memory.lock().await;
            window.append(Message::user(&rendered.user));
            window.append(Message::assistant(&final_text));
        }

        self.event_bus.publish(DomainEvent::RoleInvoked {
            role: self.name.clone(),
            operation: operation.to_string(),
            tool_calls: tool_calls_made,
            timestamp: chrono::Utc::now(),
        });

        info!(
            role = %self.name,
            operation,
            tool_calls = tool_calls_made,
            "Role operation completed"
        );

        Ok(final_text)
    }
}

/// Build a bindings map from string pairs.
pub fn bindings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn preview(text: &str) -> String {
    const LIMIT: usize = 80;
    if text.len() <= LIMIT {
        text.to_string()
    } else {
        let cut = text
            .char_indices()
            .take_while(|(i, _)| *i < LIMIT)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}…", &text[..cut])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use redraft_core::error::RetrievalError;
    use redraft_core::retrieval::Embedder;
    use redraft_core::tool::{Tool, ToolResult};
    use redraft_memory::InMemoryVectorStore;
    use async_trait::async_trait;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echoes back the input"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": { "text": { "type": "string" } },
                "required": ["text"]
            })
        }
        async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
            Ok(ToolResult {
                call_id: String::new(),
                success: true,
                output: arguments["text"].as_str().unwrap_or("").to_string(),
            })
        }
    }

    fn echo_registry() -> Arc<ToolRegistry> {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        Arc::new(registry)
    }

    fn plain_role(provider: Arc<SequentialMockProvider>) -> Role {
        Role::new("tester", provider, "mock-model", 0.0, Arc::new(EventBus::default()))
            .with_operation(
                "answer",
                PromptTemplate::new(vec!["You are a test persona."], "{{query}}"),
            )
    }

    #[tokio::test]
    async fn simple_text_invocation() {
        let provider = Arc::new(SequentialMockProvider::single_text("Final answer"));
        let role = plain_role(provider.clone());

        let text = role
            .invoke("answer", &bindings(&[("query", "Hello")]))
            .await
            .unwrap();
        assert_eq!(text, "Final answer");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn unknown_operation_fails() {
        let provider = Arc::new(SequentialMockProvider::single_text("unused"));
        let role = plain_role(provider);

        let err = role.invoke("missing", &HashMap::new()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Template(TemplateError::UnknownOperation(_))
        ));
    }

    #[tokio::test]
    async fn unbound_slot_fails_before_any_model_call() {
        let provider = Arc::new(SequentialMockProvider::single_text("unused"));
        let role = plain_role(provider.clone());

        let err = role.invoke("answer", &HashMap::new()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Template(TemplateError::UnboundSlot { .. })
        ));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn tool_call_round_trip() {
        let provider = Arc::new(SequentialMockProvider::tool_then_answer(
            vec![make_tool_call("echo", serde_json::json!({"text": "ping"}))],
            "Calling the echo tool",
            "The tool said: ping",
        ));
        let role = plain_role(provider.clone()).with_tools(echo_registry());

        let text = role
            .invoke("answer", &bindings(&[("query", "run echo")]))
            .await
            .unwrap();
        assert_eq!(text, "The tool said: ping");
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn tool_loop_exceeded_after_exact_depth() {
        // The model requests another tool call on every response.
        let responses: Vec<_> = (0..10)
            .map(|_| {
                make_tool_call_response(
                    vec![make_tool_call("echo", serde_json::json!({"text": "again"}))],
                    "still going",
                )
            })
            .collect();
        let provider = Arc::new(SequentialMockProvider::new(responses));
        let role = plain_role(provider.clone())
            .with_tools(echo_registry())
            .with_max_tool_depth(3);

        let err = role
            .invoke("answer", &bindings(&[("query", "loop")]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Tool(ToolError::LoopExceeded { max_depth: 3 })
        ));
        // Three tool rounds executed, the fourth response triggered the bound.
        assert_eq!(provider.call_count(), 4);
    }

    #[tokio::test]
    async fn failed_tool_is_reported_to_the_model() {
        let provider = Arc::new(SequentialMockProvider::tool_then_answer(
            vec![make_tool_call("nonexistent", serde_json::json!({}))],
            "Trying a tool",
            "Recovered without the tool",
        ));
        let role = plain_role(provider.clone()).with_tools(echo_registry());

        // NotFound is folded into the transcript; the model recovers.
        let text = role
            .invoke("answer", &bindings(&[("query", "q")]))
            .await
            .unwrap();
        assert_eq!(text, "Recovered without the tool");

        let second_request = provider.request(1);
        let tool_msg = second_request
            .messages
            .iter()
            .find(|m| m.role == redraft_core::message::Role::Tool)
            .expect("tool result message in resubmitted transcript");
        assert!(tool_msg.content.contains("Tool not found"));
    }

    #[tokio::test]
    async fn memory_records_user_and_assistant_turns() {
        let provider = Arc::new(SequentialMockProvider::single_text("Remembered answer"));
        let window = Arc::new(Mutex::new(MessageWindow::new(10)));
        let role = plain_role(provider).with_memory(window.clone());

        role.invoke("answer", &bindings(&[("query", "What is up?")]))
            .await
            .unwrap();

        let snapshot = window.lock().await.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].role, redraft_core::message::Role::User);
        assert_eq!(snapshot[0].content, "What is up?");
        assert_eq!(snapshot[1].role, redraft_core::message::Role::Assistant);
        assert_eq!(snapshot[1].content, "Remembered answer");
    }

    #[tokio::test]
    async fn failed_invocation_leaves_window_untouched() {
        let provider = Arc::new(SequentialMockProvider::failing("provider down"));
        let window = Arc::new(Mutex::new(MessageWindow::new(10)));
        let role = plain_role(provider).with_memory(window.clone());

        let err = role
            .invoke("answer", &bindings(&[("query", "q")]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
        assert!(window.lock().await.is_empty());
    }

    #[tokio::test]
    async fn window_snapshot_is_included_in_context() {
        let provider = Arc::new(SequentialMockProvider::new(vec![
            make_text_response("first"),
            make_text_response("second"),
        ]));
        let window = Arc::new(Mutex::new(MessageWindow::new(10)));
        let role = plain_role(provider.clone()).with_memory(window);

        role.invoke("answer", &bindings(&[("query", "turn one")]))
            .await
            .unwrap();
        role.invoke("answer", &bindings(&[("query", "turn two")]))
            .await
            .unwrap();

        let second_request = provider.request(1);
        let contents: Vec<&str> = second_request
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert!(contents.contains(&"turn one"));
        assert!(contents.contains(&"first"));
        assert!(contents.contains(&"turn two"));
    }

    /// Embedder that maps any text onto a single axis.
    struct FlatEmbedder;

    #[async_trait]
    impl Embedder for FlatEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, RetrievalError> {
            Ok(vec![1.0, 0.0])
        }
    }

    async fn retriever_with(facts: &[&str], min_score: f32) -> Arc<Retriever> {
        let store = Arc::new(InMemoryVectorStore::new());
        let retriever = Retriever::new(Arc::new(FlatEmbedder), store, 2, min_score);
        for fact in facts {
            retriever.ingest(fact).await.unwrap();
        }
        Arc::new(retriever)
    }

    #[tokio::test]
    async fn retrieving_operation_injects_context_block() {
        let provider = Arc::new(SequentialMockProvider::single_text("Grounded answer"));
        let retriever =
            retriever_with(&["The release shipped in 2024 with native vector search."], 0.5).await;

        let role = Role::new(
            "recall",
            provider.clone(),
            "mock-model",
            0.0,
            Arc::new(EventBus::default()),
        )
        .with_retrieving_operation(
            "answer",
            PromptTemplate::new(vec!["Use the provided context to answer."], "{{query}}"),
        )
        .with_retriever(retriever);

        role.invoke("answer", &bindings(&[("query", "When was the release?")]))
            .await
            .unwrap();

        let request = provider.request(0);
        let system = &request.messages[0];
        assert_eq!(system.role, redraft_core::message::Role::System);
        assert!(system.content.contains("Retrieved Context"));
        assert!(system.content.contains("shipped in 2024"));
    }

    #[tokio::test]
    async fn empty_retrieval_omits_context_block() {
        let provider = Arc::new(SequentialMockProvider::single_text("Ungrounded answer"));
        // Floor above everything: retrieval comes back empty, which is fine.
        let retriever = retriever_with(&["irrelevant"], 2.0).await;

        let role = Role::new(
            "recall",
            provider.clone(),
            "mock-model",
            0.0,
            Arc::new(EventBus::default()),
        )
        .with_retrieving_operation(
            "answer",
            PromptTemplate::new(vec!["Use the provided context to answer."], "{{query}}"),
        )
        .with_retriever(retriever);

        let text = role
            .invoke("answer", &bindings(&[("query", "anything")]))
            .await
            .unwrap();
        assert_eq!(text, "Ungrounded answer");
        assert!(!provider.request(0).messages[0].content.contains("Retrieved Context"));
    }

    #[tokio::test]
    async fn non_retrieving_operation_skips_retriever() {
        let provider = Arc::new(SequentialMockProvider::single_text("answer"));
        let retriever = retriever_with(&["a fact"], 0.0).await;

        let role = plain_role(provider.clone()).with_retriever(retriever);
        role.invoke("answer", &bindings(&[("query", "q")]))
            .await
            .unwrap();

        assert!(!provider.request(0).messages[0].content.contains("Retrieved Context"));
    }
}
