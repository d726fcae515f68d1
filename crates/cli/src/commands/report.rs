//! `redraft report` — the draft → review → refine workflow.

use redraft_core::event::EventBus;
use redraft_roles::presets;
use redraft_tools::search_registry;
use redraft_workflow::ReviewCycle;
use std::sync::Arc;

use super::{build_provider, build_search_backend, load_config_with_provider_key};

pub async fn run(query: &str) -> anyhow::Result<()> {
    let config = load_config_with_provider_key()?;
    let provider = build_provider(&config)?;
    let backend = build_search_backend(&config)?;

    let tools = Arc::new(search_registry(backend));
    let event_bus = Arc::new(EventBus::default());

    let analyst = presets::junior_analyst(
        provider.clone(),
        &config.provider.model,
        &config.roles,
        tools,
        event_bus.clone(),
    );
    let editor = presets::senior_editor(
        provider,
        &config.provider.model,
        &config.workflow.approval_token,
        event_bus.clone(),
    );

    let workflow = ReviewCycle::new(analyst, editor, &config.workflow, event_bus);

    println!("Step 1: Analyst is researching...");
    let outcome = workflow.run(query).await?;

    for (i, feedback) in outcome.feedback_history.iter().enumerate() {
        println!("--- Review {} ---", i + 1);
        println!("{feedback}");
    }

    println!("--- Final {} Draft ---", if outcome.approved { "Approved" } else { "Unapproved" });
    println!("{}", outcome.draft);
    Ok(())
}
