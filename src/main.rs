//! Webdex main entry point
//!
//! This is the command-line interface for the Webdex page indexer.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use webdex::config::{load_config, Config};
use webdex::crawler::crawl;
use webdex::output::{load_index_statistics, print_index_statistics, print_statistics};
use webdex::sources::{read_url_list, SourceKind};
use webdex::JsonIndexStore;

/// Webdex: a flat JSON index of web resources
///
/// Webdex crawls JSON page feeds, XML sitemaps and repository listings
/// and merges every page it finds into JSON index files keyed by link.
#[derive(Parser, Debug)]
#[command(name = "webdex")]
#[command(version)]
#[command(about = "Builds a flat JSON index of web resources", long_about = None)]
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

    /// Crawl a single source family
    #[arg(long, value_enum)]
    only: Option<SourceKind>,

    /// Validate config and show what would be crawled without fetching anything
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics for the index files and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    if cli.dry_run {
        handle_dry_run(&config, cli.only)
    } else if cli.stats {
        handle_stats(&config)
    } else {
        handle_crawl(config, cli.only).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("webdex=info,warn"),
            1 => EnvFilter::new("webdex=debug,info"),
            2 => EnvFilter::new("webdex=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn selected(only: Option<SourceKind>) -> impl Iterator<Item = SourceKind> {
    SourceKind::ALL
        .into_iter()
        .filter(move |kind| only.map_or(true, |only| only == *kind))
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, only: Option<SourceKind>) -> anyhow::Result<()> {
    println!("=== Webdex Dry Run ===\n");

    println!("User Agent:");
    println!(
        "  {}",
        webdex::crawler::user_agent_string(&config.user_agent)
    );

    println!("\nIndex:");
    println!("  Pages: {}", config.output.page_index.display());
    println!("  Repositories: {}", config.output.repository_index.display());
    println!("  Scalar merge: {:?}", config.index.scalar_merge);

    println!("\nRepository listings:");
    println!("  Host root: {}", config.repository.host_root);
    println!("  Child titles: {}", config.repository.child_titles);
    println!("  Descendants only: {}", config.repository.descendants_only);

    let mut total = 0;
    for kind in selected(only) {
        match config.sources.list_for(kind) {
            Some(path) => {
                let urls = read_url_list(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                println!("\n{} ({} from {}):", kind, urls.len(), path.display());
                for url in &urls {
                    println!("  * {}", url);
                }
                total += urls.len();
            }
            None => println!("\n{}: not configured", kind),
        }
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would crawl {} source URLs", total);

    Ok(())
}

/// Handles the --stats mode: summarises the index files
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("=== Index Statistics ===\n");

    let paths = [&config.output.page_index, &config.output.repository_index];
    for (i, path) in paths.iter().enumerate() {
        if i > 0 && paths[0] == paths[i] {
            continue;
        }
        let store = JsonIndexStore::new(path.as_path(), config.index.scalar_merge);
        let stats = load_index_statistics(&store)?;
        print_index_statistics(&stats);
        println!();
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, only: Option<SourceKind>) -> anyhow::Result<()> {
    match only {
        Some(kind) => tracing::info!("Starting crawl of {} only", kind),
        None => tracing::info!(
            "Starting crawl of {} source families",
            config.sources.configured_count()
        ),
    }

    match crawl(config, only).await {
        Ok(report) => {
            tracing::info!("Crawl completed successfully");
            print_statistics(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
