//! Preset personas.
//!
//! These mirror the four agents the system ships with: a junior analyst
//! that drafts and refines reports, a senior editor that critiques them,
//! a researcher grounded by retrieval, and a planning analyst that
//! decomposes queries before searching. Each is plain configuration over
//! [`Role`] — callers inject the provider, tools, window, and retriever.

use redraft_config::RolesConfig;
use redraft_core::event::EventBus;
use redraft_core::message::MessageWindow;
use redraft_core::provider::Provider;
use redraft_core::template::PromptTemplate;
use redraft_core::tool::ToolRegistry;
use redraft_memory::Retriever;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::role::Role;

/// The analyst that drafts and refines reports.
///
/// Operations: `draft` (binds `{{query}}`) and `refine` (binds
/// `{{draft}}` and `{{feedback}}`).
pub fn junior_analyst(
    provider: Arc<dyn Provider>,
    model: &str,
    config: &RolesConfig,
    tools: Arc<ToolRegistry>,
    event_bus: Arc<EventBus>,
) -> Role {
    Role::new("junior_analyst", provider, model, config.temperature, event_bus)
        .with_operation(
            "draft",
            PromptTemplate::new(
                vec![
                    "You are a junior research analyst.",
                    "Draft a detailed answer based on the user's query.",
                    "Use your search tool to find facts.",
                    "Include citations.",
                ],
                "{{query}}",
            ),
        )
        .with_operation(
            "refine",
            PromptTemplate::new(
                vec!["You are fixing a report based on editor feedback."],
                "Original Draft: {{draft}}\n\nEditor Feedback: {{feedback}}\n\nPlease rewrite the report.",
            ),
        )
        .with_tools(tools)
        .with_max_tool_depth(config.max_tool_depth)
}

/// The editor that critiques drafts.
///
/// Operation: `review` (binds `{{draft}}`). Runs at temperature 0.0
/// regardless of the configured default — critiques should be
/// deterministic.
pub fn senior_editor(
    provider: Arc<dyn Provider>,
    model: &str,
    approval_token: &str,
    event_bus: Arc<EventBus>,
) -> Role {
    Role::new("senior_editor", provider, model, 0.0, event_bus).with_operation(
        "review",
        PromptTemplate::new(
            vec![
                "You are a Senior Editor at a technical publication.".to_string(),
                "Critique the provided draft for: 1. Missing Citations 2. Logical Gaps 3. Tone."
                    .to_string(),
                format!("If the draft is good, output '{approval_token}'."),
                "If bad, output a bulleted list of feedback.".to_string(),
            ],
            "{{draft}}",
        ),
    )
}

/// The search-equipped researcher with a conversation window.
///
/// Operation: `answer` (binds `{{query}}`).
pub fn researcher(
    provider: Arc<dyn Provider>,
    model: &str,
    config: &RolesConfig,
    tools: Arc<ToolRegistry>,
    window: Arc<Mutex<MessageWindow>>,
    event_bus: Arc<EventBus>,
) -> Role {
    Role::new("researcher", provider, model, config.temperature, event_bus)
        .with_operation(
            "answer",
            PromptTemplate::new(
                vec![
                    "You are a Principal Technical Analyst.",
                    "If you do not know the answer, you MUST use the search tool.",
                    "Do not guess. Verify facts before answering.",
                    "Format your answer with bullet points and cite sources.",
                ],
                "{{query}}",
            ),
        )
        .with_tools(tools)
        .with_memory(window)
        .with_max_tool_depth(config.max_tool_depth)
}

/// The retrieval-grounded assistant with a conversation window.
///
/// Operation: `answer` (binds `{{query}}`), with retrieval requested.
pub fn recall_assistant(
    provider: Arc<dyn Provider>,
    model: &str,
    config: &RolesConfig,
    retriever: Arc<Retriever>,
    window: Arc<Mutex<MessageWindow>>,
    event_bus: Arc<EventBus>,
) -> Role {
    Role::new("recall_assistant", provider, model, config.temperature, event_bus)
        .with_retrieving_operation(
            "answer",
            PromptTemplate::new(
                vec!["You are a helpful research assistant. Use the provided context to answer."],
                "{{query}}",
            ),
        )
        .with_retriever(retriever)
        .with_memory(window)
}

/// The self-directed planner.
///
/// Operation: `research` (binds `{{query}}`). The persona is instructed
/// to decompose, emit a `<plan>…</plan>` block, search per step, and
/// synthesize. The block is free-form model output — nothing here parses
/// or enforces its shape; the final text is returned verbatim.
pub fn planning_analyst(
    provider: Arc<dyn Provider>,
    model: &str,
    config: &RolesConfig,
    tools: Arc<ToolRegistry>,
    window: Arc<Mutex<MessageWindow>>,
    event_bus: Arc<EventBus>,
) -> Role {
    Role::new("planning_analyst", provider, model, config.temperature, event_bus)
        .with_operation(
            "research",
            PromptTemplate::new(
                vec![
                    "You are a Principal Research Architect.",
                    "You MUST follow this strictly sequential process for every query:",
                    "",
                    "1. DECOMPOSITION: Break the user's request into distinct sub-questions.",
                    "2. PLANNING: Create a step-by-step plan to answer each sub-question.",
                    "   - Output this plan inside <plan>...</plan> XML tags.",
                    "3. EXECUTION: Use the 'searchWeb' tool to gather facts for each step of your plan.",
                    "   - Do NOT answer from memory. You MUST search.",
                    "4. SYNTHESIS: Compile the gathered facts into a final answer.",
                    "",
                    "Format the final output as:",
                    "<plan>",
                    "1. Search for X...",
                    "2. Search for Y...",
                    "</plan>",
                    "",
                    "--- RESEARCH REPORT ---",
                    "(Your final answer here with citations)",
                ],
                "{{query}}",
            ),
        )
        .with_tools(tools)
        .with_memory(window)
        .with_max_tool_depth(config.max_tool_depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::bindings;
    use crate::test_helpers::*;

    fn empty_registry() -> Arc<ToolRegistry> {
        Arc::new(ToolRegistry::new())
    }

    #[tokio::test]
    async fn analyst_draft_and_refine_operations() {
        let provider = Arc::new(SequentialMockProvider::new(vec![
            make_text_response("First draft"),
            make_text_response("Refined draft"),
        ]));
        let analyst = junior_analyst(
            provider.clone(),
            "mock-model",
            &RolesConfig::default(),
            empty_registry(),
            Arc::new(EventBus::default()),
        );

        let draft = analyst
            .invoke("draft", &bindings(&[("query", "What changed in the 23ai release?")]))
            .await
            .unwrap();
        assert_eq!(draft, "First draft");

        let refined = analyst
            .invoke(
                "refine",
                &bindings(&[("draft", &draft), ("feedback", "- add citations")]),
            )
            .await
            .unwrap();
        assert_eq!(refined, "Refined draft");

        // The refine prompt carried both bound variables.
        let refine_request = provider.request(1);
        let user = refine_request.messages.last().unwrap();
        assert!(user.content.contains("First draft"));
        assert!(user.content.contains("add citations"));
    }

    #[tokio::test]
    async fn editor_reviews_at_temperature_zero() {
        let provider = Arc::new(SequentialMockProvider::single_text("APPROVED"));
        let editor = senior_editor(
            provider.clone(),
            "mock-model",
            "APPROVED",
            Arc::new(EventBus::default()),
        );

        let feedback = editor
            .invoke("review", &bindings(&[("draft", "Some draft")]))
            .await
            .unwrap();
        assert_eq!(feedback, "APPROVED");

        let request = provider.request(0);
        assert!(request.temperature.abs() < f32::EPSILON);
        assert!(request.messages[0].content.contains("APPROVED"));
    }

    #[tokio::test]
    async fn planner_forwards_plan_block_verbatim() {
        let report = "<plan>\n1. Search for X\n2. Search for Y\n</plan>\n\n--- RESEARCH REPORT ---\nFindings.";
        let provider = Arc::new(SequentialMockProvider::single_text(report));
        let planner = planning_analyst(
            provider,
            "mock-model",
            &RolesConfig::default(),
            empty_registry(),
            Arc::new(Mutex::new(MessageWindow::default())),
            Arc::new(EventBus::default()),
        );

        let out = planner
            .invoke("research", &bindings(&[("query", "Compare the two releases")]))
            .await
            .unwrap();
        // The plan block is opaque content, forwarded untouched.
        assert_eq!(out, report);
    }

    #[tokio::test]
    async fn researcher_declares_search_tool() {
        let provider = Arc::new(SequentialMockProvider::single_text("answer"));
        let mut registry = ToolRegistry::new();

        struct NoopSearch;
        #[async_trait::async_trait]
        impl redraft_core::tool::Tool for NoopSearch {
            fn name(&self) -> &str {
                "searchWeb"
            }
            fn description(&self) -> &str {
                "Search the web"
            }
            fn parameters_schema(&self) -> serde_json::Value {
                serde_json::json!({"type": "object"})
            }
            async fn execute(
                &self,
                _arguments: serde_json::Value,
            ) -> Result<redraft_core::tool::ToolResult, redraft_core::error::ToolError>
            {
                Ok(redraft_core::tool::ToolResult {
                    call_id: String::new(),
                    success: true,
                    output: "[]".into(),
                })
            }
        }
        registry.register(Box::new(NoopSearch));

        let role = researcher(
            provider.clone(),
            "mock-model",
            &RolesConfig::default(),
            Arc::new(registry),
            Arc::new(Mutex::new(MessageWindow::default())),
            Arc::new(EventBus::default()),
        );

        role.invoke("answer", &bindings(&[("query", "latest ratings")]))
            .await
            .unwrap();

        let request = provider.request(0);
        assert_eq!(request.tools.len(), 1);
        assert_eq!(request.tools[0].name, "searchWeb");
    }
}
