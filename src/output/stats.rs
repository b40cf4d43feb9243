//! Crawl statistics and the observer hook that feeds them
//!
//! Rows the crawl cannot use are skipped without aborting. They are not
//! silently dropped: every skip is reported through [`CrawlObserver`], and
//! the default observer, [`CrawlStatistics`], counts and logs them.

use crate::LinkResolutionError;
use std::fmt;

/// Why a listing row contributed nothing to a result set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The row has no code button (header, separator, or malformed row)
    NoCode,
    /// The row's detail link is missing or unusable
    NoDetailLink(LinkResolutionError),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCode => write!(f, "no code"),
            Self::NoDetailLink(e) => write!(f, "{}", e),
        }
    }
}

/// Receives progress and skip notifications from the crawler
///
/// All methods default to doing nothing.
pub trait CrawlObserver {
    /// A listing page was fetched and parsed
    fn page_done(&mut self, _page: u32, _rows: usize) {}

    /// A row was left out of a result set
    fn row_skipped(&mut self, _page: u32, _row: usize, _reason: &SkipReason) {}

    /// A detail page was fetched for `code`
    fn detail_fetched(&mut self, _code: &str, _combinations: usize) {}
}

/// Counters collected over one crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Listing pages fetched
    pub listing_pages: u64,

    /// Body rows seen across all listing pages
    pub rows_seen: u64,

    /// Rows skipped because they carry no code
    pub rows_without_code: u64,

    /// Rows skipped because their detail link could not be resolved
    pub rows_without_link: u64,

    /// Detail pages fetched
    pub detail_pages: u64,

    /// Combination codes collected over all detail pages
    pub combinations_found: u64,
}

impl CrawlObserver for CrawlStatistics {
    fn page_done(&mut self, page: u32, rows: usize) {
        self.listing_pages += 1;
        self.rows_seen += rows as u64;
        tracing::debug!("Page {}: {} rows", page, rows);
    }

    fn row_skipped(&mut self, page: u32, row: usize, reason: &SkipReason) {
        match reason {
            SkipReason::NoCode => self.rows_without_code += 1,
            SkipReason::NoDetailLink(_) => self.rows_without_link += 1,
        }
        tracing::debug!("Skipped page {} row {}: {}", page, row, reason);
    }

    fn detail_fetched(&mut self, code: &str, combinations: usize) {
        self.detail_pages += 1;
        self.combinations_found += combinations as u64;
        tracing::trace!("{}: {} unacceptable combinations", code, combinations);
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Listing:");
    println!("  Pages fetched: {}", stats.listing_pages);
    println!("  Rows seen: {}", stats.rows_seen);
    println!("  Rows without a code: {}", stats.rows_without_code);
    println!();

    println!("Combinations:");
    println!("  Detail pages fetched: {}", stats.detail_pages);
    println!("  Rows without a detail link: {}", stats.rows_without_link);
    println!("  Combinations found: {}", stats.combinations_found);
}
