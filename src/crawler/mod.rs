//! Crawler module for the CCSD schedule
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `Fetch` trait
//! - Page-count discovery from the pagination indicator
//! - Listing row and detail page extraction
//! - Overall crawl coordination and result accumulation

mod accumulator;
mod coordinator;
mod fetcher;
mod pagination;
mod parser;
#[cfg(test)]
mod testing;

pub use accumulator::ScheduleAccumulator;
pub use coordinator::{Coordinator, CrawlOutput};
pub use fetcher::{build_http_client, fetch_url, Fetch, HttpFetcher};
pub use pagination::{discover_page_count, parse_page_count};
pub use parser::{parse_combinations, parse_listing, ScheduleColumns};

use crate::config::Config;
use crate::output::{write_outputs, CrawlStatistics};
use crate::Result;

/// Runs a complete crawl operation
///
/// This is the main entry point for a crawl. It will:
/// 1. Build the HTTP client
/// 2. Discover the number of listing pages
/// 3. Crawl the schedule and, unless disabled, the detail pages
/// 4. Write the CSV files
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `include_combinations` - Whether to crawl detail pages
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Crawl completed and output written
/// * `Err(CcsdError)` - Crawl failed; nothing was written
pub async fn crawl(config: Config, include_combinations: bool) -> Result<CrawlStatistics> {
    let fetcher = HttpFetcher::from_config(&config.http)?;
    let output_config = config.output.clone();

    let mut coordinator = Coordinator::new(config, fetcher)?;
    let output = coordinator.run(include_combinations).await?;

    write_outputs(&output_config, &output)?;

    Ok(coordinator.into_observer())
}
