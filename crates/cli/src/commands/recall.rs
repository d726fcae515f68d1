//! `redraft recall` — seed facts, then answer with retrieval.

use redraft_core::event::EventBus;
use redraft_core::message::MessageWindow;
use redraft_memory::{InMemoryVectorStore, Retriever};
use redraft_roles::{bindings, presets};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{build_provider, load_config_with_provider_key};

pub async fn run(query: &str, seeds: &[String]) -> anyhow::Result<()> {
    let config = load_config_with_provider_key()?;
    let provider = build_provider(&config)?;

    // The provider doubles as the embedder through its embeddings endpoint.
    let store = Arc::new(InMemoryVectorStore::new());
    let retriever = Arc::new(Retriever::new(
        provider.clone(),
        store,
        config.retrieval.top_k,
        config.retrieval.min_score,
    ));

    for seed in seeds {
        retriever.ingest(seed).await?;
        println!("Ingested: {seed}");
    }

    let window = Arc::new(Mutex::new(MessageWindow::with_policy(
        config.window.capacity,
        config.window.pin_system,
    )));
    let event_bus = Arc::new(EventBus::default());

    let assistant = presets::recall_assistant(
        provider,
        &config.provider.model,
        &config.roles,
        retriever,
        window,
        event_bus,
    );

    let answer = assistant
        .invoke("answer", &bindings(&[("query", query)]))
        .await?;
    println!("--- Answer ---");
    println!("{answer}");
    Ok(())
}
