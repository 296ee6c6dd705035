//! Shelf-Scout main entry point
//!
//! This is the command-line interface for the Shelf-Scout product scraper.

use anyhow::Context;
use clap::Parser;
use shelf_scout::config::{load_config_with_hash, Config};
use shelf_scout::crawler::{listing_plan, run_scrape};
use shelf_scout::output::print_summary;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Shelf-Scout: a polite product-listing scraper
///
/// Shelf-Scout walks a storefront's paginated listing, visits every listed product,
/// keeps best sellers and well-reviewed products, and appends them to a CSV file.
#[derive(Parser, Debug)]
#[command(name = "shelf-scout")]
#[command(version = "1.0.0")]
#[command(about = "A polite product-listing scraper", long_about = None)]
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

    /// Validate config and show what would be requested without fetching anything
    #[arg(long)]
    dry_run: bool,

    /// Ignore the response cache for this run
    #[arg(long)]
    no_cache: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    if cli.dry_run {
        handle_dry_run(&config)
    } else {
        handle_scrape(config, !cli.no_cache, cli.quiet).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shelf_scout=info,warn"),
            1 => EnvFilter::new("shelf_scout=debug,info"),
            2 => EnvFilter::new("shelf_scout=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the listing pages to visit
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Shelf-Scout Dry Run ===\n");

    println!("Site:");
    println!("  Name: {}", config.site.name);
    println!("  Root: {}", config.site.root);
    println!("  Currency: {}", config.site.currency);
    println!("  Host pattern: {}", config.site.host_pattern());

    println!("\nPoliteness:");
    println!("  Parallelism per host: {}", config.politeness.parallelism);
    println!(
        "  Delay: {}ms + up to {}ms jitter",
        config.politeness.delay_ms, config.politeness.random_delay_ms
    );
    println!(
        "  Retries: {} (backoff {}ms)",
        config.politeness.max_retries, config.politeness.retry_backoff_ms
    );
    println!(
        "  Request timeout: {}s",
        config.politeness.request_timeout_secs
    );

    println!("\nOutput:");
    println!("  CSV: {}", config.output.csv_path);
    match &config.http.cache_dir {
        Some(dir) => println!("  Cache: {}/{}", dir, config.site.name),
        None => println!("  Cache: disabled"),
    }
    println!(
        "  Minimum rating count: {}",
        config.filter.min_rating_count
    );

    let pages = listing_plan(config).context("Failed to build listing URLs")?;
    println!("\nListing Pages ({}):", pages.len());
    for url in &pages {
        println!("  - {}", url);
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main scrape operation
async fn handle_scrape(config: Config, use_cache: bool, quiet: bool) -> anyhow::Result<()> {
    if !use_cache {
        tracing::info!("Response cache disabled for this run");
    }

    match run_scrape(config, use_cache).await {
        Ok(summary) => {
            tracing::info!("Scrape completed successfully");
            if !quiet {
                print_summary(&summary);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}
