//! Weibo comments main entry point
//!
//! This is the command-line interface for the search-and-comment-tree crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use weibo_comments::config::{load_config_with_hash, Config, ConfigOverrides};
use weibo_comments::crawler::Coordinator;
use weibo_comments::output::{print_statistics, sink_for};

/// Weibo comments: walks the comment trees of posts matching a search
///
/// Lists posts from the search results, then pages through every top-level
/// comment and reply of each post, keeping replies newer than the recency
/// window and printing cleaned comment text.
#[derive(Parser, Debug)]
#[command(name = "weibo-comments")]
#[command(version = "1.0.0")]
#[command(about = "Crawl comment trees of Weibo search results", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Search query (overrides the config file)
    #[arg(long)]
    query: Option<String>,

    /// Number of search result pages to scan (overrides the config file)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pages: Option<u32>,

    /// Keep replies newer than this many months (overrides the config file)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    months: Option<u32>,

    /// Emit records as JSON Lines regardless of the configured format
    #[arg(long)]
    json: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with = "detail")]
    dry_run: bool,

    /// Look up a single post's details by its mid and exit
    #[arg(long, value_name = "MID", conflicts_with = "dry_run")]
    detail: Option<String>,
}

impl Cli {
    /// Collects the flags that replace config file values
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            query: self.query.clone(),
            max_pages: self.pages,
            months_ago: self.months,
            force_jsonl: self.json,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e).context(format!("loading {}", cli.config.display()));
        }
    };
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if let Err(e) = cli.overrides().apply(&mut config) {
        tracing::error!("Invalid command-line override: {}", e);
        return Err(e).context("applying command-line overrides");
    }

    if cli.dry_run {
        handle_dry_run(config)
    } else if let Some(mid) = cli.detail.as_deref() {
        handle_detail(config, mid).await
    } else {
        handle_crawl(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only records.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("weibo_comments=info,warn"),
            1 => EnvFilter::new("weibo_comments=debug,info"),
            2 => EnvFilter::new("weibo_comments=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: Config) -> anyhow::Result<()> {
    let coordinator = Coordinator::new(config.clone()).context("building crawler")?;

    println!("=== Weibo Comments Dry Run ===\n");

    println!("Search:");
    println!("  Query: {}", config.search.query);
    println!("  Pages: {}", config.search.max_pages);

    println!("\nCrawler:");
    println!(
        "  Keep replies newer than: {} ({} month(s) back)",
        coordinator.cutoff(),
        config.crawler.months_ago
    );
    println!("  Delay after each request: {}ms", config.crawler.request_delay_ms);
    println!("  Delay between comment pages: {}ms", config.crawler.page_delay_ms);
    println!("  Delay before detail retry: {}ms", config.crawler.retry_delay_ms);
    println!("  Fetch post details: {}", config.crawler.fetch_post_details);

    println!("\nEndpoints:");
    println!("  Search: {}", config.endpoints.search_url);
    println!("  Comments: {}", config.endpoints.comments_url);
    println!("  Detail: {}", config.endpoints.detail_url);

    println!("\nOutput: {:?}", config.output.format);

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --detail mode: prints one post's metadata
async fn handle_detail(config: Config, mid: &str) -> anyhow::Result<()> {
    let coordinator = Coordinator::new(config).context("building crawler")?;

    match coordinator.fetch_detail(mid).await {
        Ok(detail) => {
            println!("Post: {}", mid);
            println!("  Author: {} ({})", detail.screen_name, detail.user_id);
            println!("  Created: {}", detail.created_at);
            println!("  Comments: {}", detail.comments_count);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Detail lookup failed: {}", e);
            Err(e).context(format!("looking up post {}", mid))
        }
    }
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    let format = config.output.format;
    let coordinator = Coordinator::new(config).context("building crawler")?;

    let stdout = std::io::stdout();
    let mut sink = sink_for(format, stdout.lock());

    match coordinator.run(sink.as_mut()).await {
        Ok(stats) => {
            print_statistics(&stats);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e).context("crawl aborted")
        }
    }
}
