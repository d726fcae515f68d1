//! Workflow controller — the draft → review → refine state machine.
//!
//! A [`ReviewCycle`] sequences two roles: an analyst that drafts and
//! refines, and an editor that critiques. The editor's feedback either
//! approves the draft (a cheap string check against a fixed token, not a
//! second model call) or sends it back for one more refinement, up to a
//! configured budget. Steps are strictly sequential — each one's input is
//! the previous one's output — and any step failure aborts the run: a
//! failed draft never proceeds to review.

use chrono::Utc;
use redraft_config::WorkflowConfig;
use redraft_core::error::Error;
use redraft_core::event::{DomainEvent, EventBus};
use redraft_roles::{Role, bindings};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Operation names the controller expects its roles to expose.
pub const DRAFT_OP: &str = "draft";
pub const REVIEW_OP: &str = "review";
pub const REFINE_OP: &str = "refine";

/// The controller's position in the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Drafting,
    Reviewing,
    Refining,
    /// Terminal: the editor approved the draft.
    Approved,
    /// Terminal: the refinement budget ran out without approval.
    Done,
}

/// Per-run state, mutated only by the controller.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowState {
    pub query: String,
    pub draft: Option<String>,
    pub feedback: Option<String>,
    pub iteration: u32,
    pub phase: Phase,
}

impl WorkflowState {
    fn new(query: &str) -> Self {
        Self {
            query: query.to_string(),
            draft: None,
            feedback: None,
            iteration: 0,
            phase: Phase::Drafting,
        }
    }
}

/// The result of a completed run.
#[derive(Debug, Clone)]
pub struct WorkflowOutcome {
    /// The final draft (refined or original).
    pub draft: String,
    /// Whether the editor approved it.
    pub approved: bool,
    /// Refinement passes performed.
    pub iterations: u32,
    /// Every piece of editor feedback, in order.
    pub feedback_history: Vec<String>,
}

/// The draft → review → refine controller.
pub struct ReviewCycle {
    analyst: Role,
    editor: Role,
    approval_token: String,
    max_refinements: u32,
    event_bus: Arc<EventBus>,
}

impl ReviewCycle {
    /// Create a controller over an analyst and an editor role.
    ///
    /// The analyst must expose `draft` (slot `query`) and `refine`
    /// (slots `draft`, `feedback`); the editor must expose `review`
    /// (slot `draft`).
    pub fn new(
        analyst: Role,
        editor: Role,
        config: &WorkflowConfig,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            analyst,
            editor,
            approval_token: config.approval_token.clone(),
            max_refinements: config.max_refinements,
            event_bus,
        }
    }

    /// Whether a piece of feedback approves the draft.
    ///
    /// Case-insensitive containment of the configured token.
    fn is_approved(&self, feedback: &str) -> bool {
        feedback
            .to_lowercase()
            .contains(&self.approval_token.to_lowercase())
    }

    /// Run the workflow for one query.
    ///
    /// Reviews happen after every refinement, so at most
    /// `max_refinements + 1` review calls occur; when a review rejects
    /// with the budget already spent, the latest draft is returned
    /// unapproved.
    pub async fn run(&self, query: &str) -> Result<WorkflowOutcome, Error> {
        let mut state = WorkflowState::new(query);
        let mut feedback_history = Vec::new();

        info!(query_len = query.len(), "Workflow: drafting");
        let draft = self
            .analyst
            .invoke(DRAFT_OP, &bindings(&[("query", query)]))
            .await?;
        state.draft = Some(draft);
        state.phase = Phase::Reviewing;

        loop {
            let current = state.draft.as_deref().unwrap_or_default().to_string();

            info!(iteration = state.iteration, "Workflow: reviewing");
            let feedback = self
                .editor
                .invoke(REVIEW_OP, &bindings(&[("draft", &current)]))
                .await?;
            let approved = self.is_approved(&feedback);

            self.event_bus.publish(DomainEvent::ReviewRoundCompleted {
                iteration: state.iteration,
                approved,
                timestamp: Utc::now(),
            });

            feedback_history.push(feedback.clone());
            state.feedback = Some(feedback.clone());

            if approved {
                state.phase = Phase::Approved;
                info!(iterations = state.iteration, "Workflow: approved");
                return Ok(WorkflowOutcome {
                    draft: current,
                    approved: true,
                    iterations: state.iteration,
                    feedback_history,
                });
            }

            if state.iteration >= self.max_refinements {
                state.phase = Phase::Done;
                info!(
                    iterations = state.iteration,
                    "Workflow: refinement budget exhausted, returning latest draft"
                );
                return Ok(WorkflowOutcome {
                    draft: current,
                    approved: false,
                    iterations: state.iteration,
                    feedback_history,
                });
            }

            state.phase = Phase::Refining;
            debug!(iteration = state.iteration, "Workflow: refining");
            let refined = self
                .analyst
                .invoke(
                    REFINE_OP,
                    &bindings(&[("draft", &current), ("feedback", &feedback)]),
                )
                .await?;
            state.draft = Some(refined);
            state.iteration += 1;
            state.phase = Phase::Reviewing;
        }
    }
}
