//! `redraft init` — write a default config file.

use redraft_config::AppConfig;

pub fn run() -> anyhow::Result<()> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("Created config directory: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("Config already exists at: {}", config_path.display());
        println!("Edit it manually or delete it and re-run init.");
        return Ok(());
    }

    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("Created config at: {}", config_path.display());
    println!();
    println!("Next steps:");
    println!("  1. Set GEMINI_API_KEY (or provider.api_key in the config)");
    println!("  2. Set TAVILY_API_KEY for the search-equipped commands");
    println!("  3. Try: redraft research \"What is new in the latest release?\"");
    Ok(())
}
