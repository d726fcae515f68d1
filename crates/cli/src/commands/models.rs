//! `redraft models` — list the provider's available models.

use redraft_core::provider::Provider;

use super::{build_provider, load_config_with_provider_key};

pub async fn run() -> anyhow::Result<()> {
    let config = load_config_with_provider_key()?;
    let provider = build_provider(&config)?;

    let models = provider.list_models().await?;
    if models.is_empty() {
        println!("Provider '{}' reported no models.", provider.name());
        return Ok(());
    }

    println!("Models available from '{}':", provider.name());
    for model in models {
        println!("  {model}");
    }
    Ok(())
}
