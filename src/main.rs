//! ccsd-scrape main entry point
//!
//! This is the command-line interface for the CCSD schedule scraper.

use ccsd_scrape::config::{load_config_with_hash, Config};
use ccsd_scrape::crawler::crawl;
use ccsd_scrape::output::print_statistics;
use ccsd_scrape::url::{discovery_url, listing_url};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// ccsd-scrape: an offline copy of the CCSD schedule
///
/// Crawls every page of the CCSD schedule listing, follows each code to its
/// detail page, and writes the schedule and its unacceptable combinations
/// to CSV files.
#[derive(Parser, Debug)]
#[command(name = "ccsd-scrape")]
#[command(version = "1.0.0")]
#[command(about = "Scrapes the CCSD schedule into CSV files", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Crawl at most this many listing pages
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    max_pages: Option<u32>,

    /// Write the schedule only, without fetching detail pages
    #[arg(long)]
    schedule_only: bool,

    /// Show the resolved configuration and exit without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = Some(max_pages);
    }

    if cli.dry_run {
        handle_dry_run(&config, !cli.schedule_only)?;
    } else {
        handle_crawl(config, !cli.schedule_only, cli.quiet).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ccsd_scrape=info,warn"),
            1 => EnvFilter::new("ccsd_scrape=debug,info"),
            2 => EnvFilter::new("ccsd_scrape=trace,debug"),
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

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(
    config: &Config,
    include_combinations: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== ccsd-scrape Dry Run ===\n");

    println!("Site:");
    println!("  Discovery URL: {}", discovery_url(&config.site)?);
    println!("  First listing page: {}", listing_url(&config.site, 0)?);
    println!("  Page size: {}", config.site.page_size);
    println!("  Include inactive codes: {}", config.site.include_inactive);

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Timeout: {}s", config.http.timeout_secs);

    println!("\nCrawler:");
    println!("  Page delay: {}ms", config.crawler.page_delay_ms);
    println!(
        "  Combination delay: {}ms",
        config.crawler.combination_delay_ms
    );
    match config.crawler.max_pages {
        Some(max) => println!("  Max pages: {}", max),
        None => println!("  Max pages: all"),
    }
    println!("  Two pass: {}", config.crawler.two_pass);
    println!("  Missing fields: {:?}", config.crawler.missing_fields);
    println!("  Detail pages: {}", include_combinations);

    println!("\nOutput:");
    println!("  Schedule: {}", config.output.schedule_path);
    if include_combinations {
        println!("  Combinations: {}", config.output.combinations_path);
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: Config,
    include_combinations: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting crawl of {}", config.site.origin);

    match crawl(config, include_combinations).await {
        Ok(stats) => {
            tracing::info!("Crawl completed successfully");
            if !quiet {
                print_statistics(&stats);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
