//! redraft CLI — the main entry point.
//!
//! Commands:
//! - `init`     — Write a default config file
//! - `research` — Ask the search-equipped researcher
//! - `report`   — Run the draft → review → refine workflow
//! - `recall`   — Seed facts, then answer with retrieval
//! - `plan`     — Run the self-directed planning analyst
//! - `models`   — List the provider's available models

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "redraft",
    about = "redraft — multi-role LLM draft/review/refine orchestration",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init,

    /// Ask the search-equipped researcher a question
    Research {
        /// The question
        query: String,
    },

    /// Draft, review, and conditionally refine a report
    Report {
        /// The report topic
        query: String,
    },

    /// Answer with retrieval over seeded facts
    Recall {
        /// The question
        query: String,

        /// Facts to ingest before answering (repeatable)
        #[arg(short, long)]
        seed: Vec<String>,
    },

    /// Decompose, plan, search, and synthesize in one invocation
    Plan {
        /// The complex query
        query: String,
    },

    /// List the provider's available models
    Models,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init => commands::init::run()?,
        Commands::Research { query } => commands::research::run(&query).await?,
        Commands::Report { query } => commands::report::run(&query).await?,
        Commands::Recall { query, seed } => commands::recall::run(&query, &seed).await?,
        Commands::Plan { query } => commands::plan::run(&query).await?,
        Commands::Models => commands::models::run().await?,
    }

    Ok(())
}
