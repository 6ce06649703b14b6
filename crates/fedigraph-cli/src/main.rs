//! Fedigraph CLI - crawl the fediverse moderation graph
//!
//! Running `fedigraph` with no arguments performs a full crawl with the
//! default settings and writes `data/instance-graph.json`.

use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "fedigraph")]
#[command(author = "Fedigraph Contributors")]
#[command(version)]
#[command(about = "Map who blocks whom across the fediverse", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Registry API base URL
    #[arg(long, env = "FEDIGRAPH_REGISTRY_URL", default_value = fedigraph_crawler::DEFAULT_REGISTRY_URL)]
    registry_url: String,

    /// Registry API token
    #[arg(long, env = "INSTANCES_SOCIAL_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Cache directory for registry and block-list responses
    #[arg(long, env = "FEDIGRAPH_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Graph output file (defaults to <data-dir>/instance-graph.json)
    #[arg(short, long, env = "FEDIGRAPH_OUTPUT")]
    output: Option<PathBuf>,

    /// Number of concurrent workers
    #[arg(short, long, env = "FEDIGRAPH_CONCURRENCY", default_value_t = fedigraph_crawler::DEFAULT_POOL_SIZE)]
    concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, env = "FEDIGRAPH_TIMEOUT", default_value = "10")]
    timeout: u64,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    if let Err(e) = commands::crawl(&cli).await {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
