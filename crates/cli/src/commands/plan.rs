//! `redraft plan` — the self-directed planning analyst.

use redraft_core::event::EventBus;
use redraft_core::message::MessageWindow;
use redraft_roles::{bindings, presets};
use redraft_tools::search_registry;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{build_provider, build_search_backend, load_config_with_provider_key};

pub async fn run(query: &str) -> anyhow::Result<()> {
    let config = load_config_with_provider_key()?;
    let provider = build_provider(&config)?;
    let backend = build_search_backend(&config)?;

    let tools = Arc::new(search_registry(backend));
    let window = Arc::new(Mutex::new(MessageWindow::with_policy(
        config.window.capacity,
        config.window.pin_system,
    )));
    let event_bus = Arc::new(EventBus::default());

    let planner = presets::planning_analyst(
        provider,
        &config.provider.model,
        &config.roles,
        tools,
        window,
        event_bus,
    );

    println!("Agent is thinking and planning...");
    let response = planner
        .invoke("research", &bindings(&[("query", query)]))
        .await?;
    println!("{response}");
    Ok(())
}
