//! CLI command implementations.

use crate::Cli;
use colored::Colorize;
use fedigraph_crawler::{CrawlConfig, CrawlReport, Crawler, FetchStatus, Progress, ProgressEvent};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Maps command-line flags onto the crawl configuration.
fn build_config(cli: &Cli) -> CrawlConfig {
    let defaults = CrawlConfig::with_data_dir(&cli.data_dir);
    CrawlConfig {
        registry_url: cli.registry_url.clone(),
        api_token: cli.api_key.clone().filter(|key| !key.trim().is_empty()),
        artifact_path: cli.output.clone().unwrap_or(defaults.artifact_path.clone()),
        pool_size: cli.concurrency,
        fetch_timeout: Duration::from_secs(cli.timeout),
        ..defaults
    }
}

/// Crawl the registry and write the moderation graph.
pub async fn crawl(cli: &Cli) -> Result<()> {
    let config = build_config(cli);

    if config.api_token.is_none() && !config.registry_cache_path().exists() {
        warn!("INSTANCES_SOCIAL_API_KEY is not set and no registry cache exists");
    }

    println!("{}", "Crawling instance moderation lists...".cyan());

    let crawler = Crawler::new(config)?;
    let bar = Arc::new(BarProgress::new()?);
    let report = crawler.run(bar.clone()).await?;
    bar.finish();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &CrawlReport) {
    println!(
        "{} Crawled {} instances in {}ms",
        "✓".green(),
        report.instances.to_string().cyan(),
        report.duration.as_millis()
    );
    println!(
        "  {} {} public, {} hidden",
        "Lists:".dimmed(),
        report.public,
        report.hidden
    );
    println!(
        "  {} {} downloaded, {} cached",
        "Fetches:".dimmed(),
        report.downloaded,
        report.cached
    );
    println!(
        "  {} {} nodes, {} links ({} suspend, {} silence)",
        "Graph:".dimmed(),
        report.graph.node_count.to_string().cyan(),
        report.graph.link_count.to_string().cyan(),
        report.graph.suspends.to_string().red(),
        report.graph.silences.to_string().yellow()
    );
    println!("{} Wrote {}", "✓".green(), report.artifact.display());
}

/// Progress bar fed by every worker.
struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    fn new() -> Result<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}] eta {eta}")?,
        );
        Ok(Self { bar })
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Progress for BarProgress {
    fn started(&self, total: usize) {
        self.bar.set_length(total as u64);
    }

    fn processed(&self, event: &ProgressEvent<'_>) {
        let status = match event.status {
            FetchStatus::Downloaded => event.status.as_str().green(),
            FetchStatus::Cached => event.status.as_str().dimmed(),
            FetchStatus::Failed => event.status.as_str().red(),
        };
        self.bar.println(format!("{} {}", event, status));
        self.bar.inc(1);
    }
}
