//! Prompt templates — a role's fixed instruction set plus named slots.
//!
//! A template is an ordered list of system instruction lines and a user
//! content template. Either part may reference `{{slot}}` variables; every
//! referenced slot must be bound at render time or the render fails with
//! [`TemplateError::UnboundSlot`]. Unused bindings are ignored.

use crate::error::TemplateError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A prompt template with named variable slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Ordered system instruction lines, joined with newlines at render time.
    pub system: Vec<String>,

    /// The user-content template.
    pub user: String,
}

/// A fully rendered prompt, ready to submit.
#[derive(Debug, Clone)]
pub struct RenderedPrompt {
    pub system: String,
    pub user: String,
}

impl PromptTemplate {
    /// Create a template from system instruction lines and a user template.
    pub fn new<S: Into<String>>(system: Vec<S>, user: impl Into<String>) -> Self {
        Self {
            system: system.into_iter().map(Into::into).collect(),
            user: user.into(),
        }
    }

    /// All slot names referenced by this template, in order of first use.
    pub fn slots(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for line in self.system.iter().map(String::as_str).chain([self.user.as_str()]) {
            for slot in scan_slots(line) {
                if !seen.contains(&slot) {
                    seen.push(slot);
                }
            }
        }
        seen
    }

    /// Substitute every slot with its binding.
    ///
    /// `operation` is only used to name the failing operation in errors.
    pub fn render(
        &self,
        operation: &str,
        bindings: &HashMap<String, String>,
    ) -> Result<RenderedPrompt, TemplateError> {
        for slot in self.slots() {
            if !bindings.contains_key(&slot) {
                return Err(TemplateError::UnboundSlot {
                    operation: operation.to_string(),
                    slot,
                });
            }
        }

        Ok(RenderedPrompt {
            system: substitute(&self.system.join("\n"), bindings),
            user: substitute(&self.user, bindings),
        })
    }
}

/// Find `{{name}}` references in a line.
fn scan_slots(text: &str) -> Vec<String> {
    let mut slots = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let name = after[..end].trim();
                if !name.is_empty() {
                    slots.push(name.to_string());
                }
                rest = &after[end + 2..];
            }
            None => break,
        }
    }
    slots
}

fn substitute(text: &str, bindings: &HashMap<String, String>) -> String {
    let mut out = text.to_string();
    for (name, value) in bindings {
        out = out.replace(&format!("{{{{{name}}}}}"), value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn slots_found_in_order() {
        let tpl = PromptTemplate::new(
            vec!["You are fixing a report based on editor feedback."],
            "Original Draft: {{draft}}\n\nEditor Feedback: {{feedback}}\n\nPlease rewrite the report.",
        );
        assert_eq!(tpl.slots(), vec!["draft", "feedback"]);
    }

    #[test]
    fn render_substitutes_all_slots() {
        let tpl = PromptTemplate::new(Vec::<String>::new(), "{{a}} and {{b}}");
        let rendered = tpl
            .render("op", &bindings(&[("a", "one"), ("b", "two")]))
            .unwrap();
        assert_eq!(rendered.user, "one and two");
    }

    #[test]
    fn unbound_slot_fails_validation() {
        let tpl = PromptTemplate::new(Vec::<String>::new(), "{{draft}} {{feedback}}");
        let err = tpl
            .render("refine", &bindings(&[("draft", "text")]))
            .unwrap_err();
        match err {
            TemplateError::UnboundSlot { operation, slot } => {
                assert_eq!(operation, "refine");
                assert_eq!(slot, "feedback");
            }
            other => panic!("Expected UnboundSlot, got {other:?}"),
        }
    }

    #[test]
    fn slots_in_system_lines_are_validated() {
        let tpl = PromptTemplate::new(vec!["Write in the style of {{style}}."], "{{query}}");
        let err = tpl
            .render("draft", &bindings(&[("query", "q")]))
            .unwrap_err();
        assert!(matches!(err, TemplateError::UnboundSlot { slot, .. } if slot == "style"));
    }

    #[test]
    fn extra_bindings_are_ignored() {
        let tpl = PromptTemplate::new(Vec::<String>::new(), "{{query}}");
        let rendered = tpl
            .render("answer", &bindings(&[("query", "q"), ("unused", "x")]))
            .unwrap();
        assert_eq!(rendered.user, "q");
    }

    #[test]
    fn system_lines_joined_with_newlines() {
        let tpl = PromptTemplate::new(vec!["Line one.", "Line two."], "user");
        let rendered = tpl.render("op", &HashMap::new()).unwrap();
        assert_eq!(rendered.system, "Line one.\nLine two.");
    }

    #[test]
    fn template_without_slots_needs_no_bindings() {
        let tpl = PromptTemplate::new(vec!["Be brief."], "Hello there");
        let rendered = tpl.render("op", &HashMap::new()).unwrap();
        assert_eq!(rendered.user, "Hello there");
    }
}
