//! Crawler coordinator - main crawl orchestration logic
//!
//! This module walks the listing pages in order and coordinates:
//! - Page-count discovery
//! - Listing page fetching and row extraction
//! - Detail page fetching for unacceptable combinations
//! - The courtesy delays between pages
//!
//! Requests are strictly sequential: page 0 is fully processed before page 1
//! is requested, and rows are processed in document order.

use crate::config::Config;
use crate::crawler::accumulator::ScheduleAccumulator;
use crate::crawler::fetcher::Fetch;
use crate::crawler::pagination;
use crate::crawler::parser::{parse_combinations, parse_listing};
use crate::model::{CombinationRecord, ListingRow, ScheduleRecord};
use crate::output::{CrawlObserver, CrawlStatistics, SkipReason};
use crate::url::{discovery_url, listing_url, origin_url, resolve_detail_link};
use crate::Result;
use std::time::Duration;
use url::Url;

/// Everything one crawl produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlOutput {
    /// Number of listing pages crawled
    pub page_count: u32,

    /// Schedule records in page-then-row order
    pub schedule: Vec<ScheduleRecord>,

    /// Combination records, `None` when detail pages were not crawled
    pub combinations: Option<Vec<CombinationRecord>>,
}

/// Main crawler coordinator structure
pub struct Coordinator<F: Fetch, O: CrawlObserver = CrawlStatistics> {
    config: Config,
    fetcher: F,
    observer: O,
    origin: Url,
}

impl<F: Fetch> Coordinator<F> {
    /// Creates a coordinator that records statistics
    pub fn new(config: Config, fetcher: F) -> Result<Self> {
        Coordinator::with_observer(config, fetcher, CrawlStatistics::default())
    }
}

impl<F: Fetch, O: CrawlObserver> Coordinator<F, O> {
    /// Creates a coordinator that reports progress and skipped rows to `observer`
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CcsdError)` - The configured origin is not a valid URL
    pub fn with_observer(config: Config, fetcher: F, observer: O) -> Result<Self> {
        let origin = origin_url(&config.site)?;
        Ok(Self {
            config,
            fetcher,
            observer,
            origin,
        })
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    /// Reads the total page count from the base listing page
    pub async fn discover_page_count(&self) -> Result<u32> {
        let url = discovery_url(&self.config.site)?;
        pagination::discover_page_count(&self.fetcher, &url).await
    }

    /// Discovers the page count, applies the configured cap, and crawls
    ///
    /// # Arguments
    ///
    /// * `include_combinations` - Whether to fetch detail pages
    pub async fn run(&mut self, include_combinations: bool) -> Result<CrawlOutput> {
        let discovered = self.discover_page_count().await?;
        let page_count = match self.config.crawler.max_pages {
            Some(max) if max < discovered => {
                tracing::info!("Limiting crawl to {} of {} pages", max, discovered);
                max
            }
            _ => discovered,
        };

        self.crawl(page_count, include_combinations).await
    }

    /// Crawls `page_count` listing pages and gathers both result sets
    ///
    /// In single-pass mode (the default) each listing page is fetched once
    /// and feeds both result sets. In two-pass mode the schedule crawl runs
    /// to completion before the combination crawl fetches every listing page
    /// again.
    pub async fn crawl(
        &mut self,
        page_count: u32,
        include_combinations: bool,
    ) -> Result<CrawlOutput> {
        if self.config.crawler.two_pass {
            let schedule = self.crawl_schedule(page_count).await?;
            let combinations = if include_combinations {
                Some(self.crawl_combinations(page_count).await?)
            } else {
                None
            };
            return Ok(CrawlOutput {
                page_count,
                schedule,
                combinations,
            });
        }

        let mut accumulator = ScheduleAccumulator::new(self.config.crawler.missing_fields);
        let mut combinations = Vec::new();

        for page in 0..page_count {
            let rows = self.fetch_listing(page).await?;
            accumulator = accumulator.absorb_page(page, &rows, &mut self.observer);
            pause(self.config.crawler.page_delay()).await;

            if include_combinations {
                let found = self.combinations_for_page(page, &rows).await?;
                combinations.extend(found);
                pause(self.config.crawler.combination_delay()).await;
            }

            tracing::info!(
                "Page {}/{} done: {} schedule records, {} combination records",
                page + 1,
                page_count,
                accumulator.len(),
                combinations.len()
            );
        }

        Ok(CrawlOutput {
            page_count,
            schedule: accumulator.into_records(),
            combinations: include_combinations.then_some(combinations),
        })
    }

    /// Crawls listing pages `0..page_count` into schedule records
    ///
    /// A fetch failure or a page without a table aborts the crawl and
    /// discards the records gathered so far.
    pub async fn crawl_schedule(&mut self, page_count: u32) -> Result<Vec<ScheduleRecord>> {
        tracing::info!("Crawling schedule over {} pages", page_count);
        let mut accumulator = ScheduleAccumulator::new(self.config.crawler.missing_fields);

        for page in 0..page_count {
            let rows = self.fetch_listing(page).await?;
            accumulator = accumulator.absorb_page(page, &rows, &mut self.observer);
            tracing::info!(
                "Page {}/{}: {} schedule records so far",
                page + 1,
                page_count,
                accumulator.len()
            );
            pause(self.config.crawler.page_delay()).await;
        }

        Ok(accumulator.into_records())
    }

    /// Crawls listing pages `0..page_count` and each row's detail page
    ///
    /// Rows without a code or without a usable detail link are skipped; a
    /// failed detail page fetch aborts the crawl.
    pub async fn crawl_combinations(&mut self, page_count: u32) -> Result<Vec<CombinationRecord>> {
        tracing::info!("Crawling unacceptable combinations over {} pages", page_count);
        let mut records = Vec::new();

        for page in 0..page_count {
            let rows = self.fetch_listing(page).await?;
            let found = self.combinations_for_page(page, &rows).await?;
            records.extend(found);
            tracing::info!(
                "Page {}/{}: {} codes with combinations so far",
                page + 1,
                page_count,
                records.len()
            );
            pause(self.config.crawler.combination_delay()).await;
        }

        Ok(records)
    }

    /// Fetches and parses one listing page
    async fn fetch_listing(&mut self, page: u32) -> Result<Vec<ListingRow>> {
        let url = listing_url(&self.config.site, page)?;
        let html = self.fetcher.fetch(&url).await?;
        let rows = parse_listing(&html, url.as_str())?;
        self.observer.page_done(page, rows.len());
        Ok(rows)
    }

    /// Fetches the detail page of every coded row on a listing page
    async fn combinations_for_page(
        &mut self,
        page: u32,
        rows: &[ListingRow],
    ) -> Result<Vec<CombinationRecord>> {
        let mut records = Vec::new();

        for (index, row) in rows.iter().enumerate() {
            // Uncoded rows are reported by the schedule side.
            let Some(code) = &row.code else {
                continue;
            };

            let url = match resolve_detail_link(&self.origin, row.detail_href.as_deref()) {
                Ok(url) => url,
                Err(e) => {
                    self.observer
                        .row_skipped(page, index, &SkipReason::NoDetailLink(e));
                    continue;
                }
            };

            let html = self.fetcher.fetch(&url).await?;
            let combinations = parse_combinations(&html)?;
            self.observer.detail_fetched(code, combinations.len());

            records.push(CombinationRecord {
                code: code.clone(),
                combinations,
            });
        }

        Ok(records)
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MissingFieldPolicy;
    use crate::crawler::testing::FakeFetcher;
    use crate::{CcsdError, FetchError};

    fn test_config() -> Config {
        let mut config = Config::default();
        config.crawler.page_delay_ms = 0;
        config.crawler.combination_delay_ms = 0;
        config
    }

    fn listing_page_url(page: u32) -> String {
        listing_url(&Config::default().site, page).unwrap().to_string()
    }

    fn detail_url(code: &str) -> String {
        format!("https://www.ccsd.org.uk/ccsdschedule/Code?code={}", code)
    }

    fn code_row(code: &str) -> String {
        format!(
            r#"<tr>
                <td><a class="greenButt butt1">{code}</a></td>
                <td><a class="codelink" href="/ccsdschedule/Code?code={code}">About {code}</a></td>
                <td><a class="codelink" href="/ccsdschedule/Chapter">Chapter of {code}</a></td>
                <td>Guidance for {code}</td>
            </tr>"#
        )
    }

    fn listing(rows: &[String]) -> String {
        format!(
            "<html><body><table><tr><th>Code</th></tr>{}</table></body></html>",
            rows.concat()
        )
    }

    fn detail(codes: &[&str]) -> String {
        let buttons: Vec<String> = codes
            .iter()
            .map(|c| format!(r#"<tr><td><a class="greenButt butt1">{}</a></td></tr>"#, c))
            .collect();
        format!(
            r#"<html><body><table class="codeTr">{}</table></body></html>"#,
            buttons.concat()
        )
    }

    /// Page 0 has three coded rows, page 1 a single row with no code button.
    fn two_page_fetcher() -> FakeFetcher {
        FakeFetcher::new()
            .with_page(
                &listing_page_url(0),
                &listing(&[code_row("A1"), code_row("A2"), code_row("A3")]),
            )
            .with_page(
                &listing_page_url(1),
                &listing(&[r#"<tr><td>Section heading</td></tr>"#.to_string()]),
            )
            .with_page(&detail_url("A1"), &detail(&["B1", "B2"]))
            .with_page(&detail_url("A2"), &detail(&[]))
            .with_page(&detail_url("A3"), &detail(&["B3"]))
    }

    #[tokio::test]
    async fn test_crawl_schedule_two_pages() {
        let mut coordinator = Coordinator::new(test_config(), two_page_fetcher()).unwrap();

        let records = coordinator.crawl_schedule(2).await.unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].code, "A1");
        assert_eq!(records[0].description, "About A1");
        assert_eq!(records[0].chapter, "Chapter of A1");
        assert_eq!(records[0].guidance, "Guidance for A1");
        assert_eq!(records[2].code, "A3");
        assert_eq!(coordinator.observer().rows_without_code, 1);
        assert_eq!(coordinator.observer().listing_pages, 2);
    }

    #[tokio::test]
    async fn test_crawl_combinations() {
        let mut coordinator = Coordinator::new(test_config(), two_page_fetcher()).unwrap();

        let records = coordinator.crawl_combinations(2).await.unwrap();

        assert_eq!(
            records,
            vec![
                CombinationRecord {
                    code: "A1".to_string(),
                    combinations: vec!["B1".to_string(), "B2".to_string()],
                },
                CombinationRecord {
                    code: "A2".to_string(),
                    combinations: vec![],
                },
                CombinationRecord {
                    code: "A3".to_string(),
                    combinations: vec!["B3".to_string()],
                },
            ]
        );
        assert_eq!(coordinator.observer().detail_pages, 3);
    }

    #[tokio::test]
    async fn test_single_pass_fetches_each_listing_page_once() {
        let fetcher = two_page_fetcher();
        let mut coordinator = Coordinator::new(test_config(), fetcher).unwrap();

        let output = coordinator.crawl(2, true).await.unwrap();
        assert_eq!(output.schedule.len(), 3);
        assert_eq!(output.combinations.as_ref().map(Vec::len), Some(3));

        let requests = coordinator.fetcher.requests();
        let listing_requests = requests
            .iter()
            .filter(|url| url.contains("CCSDScheduleCode"))
            .count();
        assert_eq!(listing_requests, 2);
        assert_eq!(requests.len(), 5);
    }

    #[tokio::test]
    async fn test_single_pass_matches_two_pass() {
        let mut single = Coordinator::new(test_config(), two_page_fetcher()).unwrap();
        let mut config = test_config();
        config.crawler.two_pass = true;
        let mut double = Coordinator::new(config, two_page_fetcher()).unwrap();

        let single_output = single.crawl(2, true).await.unwrap();
        let double_output = double.crawl(2, true).await.unwrap();

        assert_eq!(single_output, double_output);
        assert_eq!(double.fetcher.requests().len(), 7);
    }

    #[tokio::test]
    async fn test_schedule_only_skips_detail_pages() {
        let mut coordinator = Coordinator::new(test_config(), two_page_fetcher()).unwrap();

        let output = coordinator.crawl(2, false).await.unwrap();

        assert_eq!(output.schedule.len(), 3);
        assert_eq!(output.combinations, None);
        assert_eq!(coordinator.fetcher.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_row_without_link_is_skipped() {
        let fetcher = FakeFetcher::new().with_page(
            &listing_page_url(0),
            &listing(&[
                concat!(
                    r#"<tr><td><a class="greenButt butt1">N1</a></td>"#,
                    r#"<td><a class="codelink">No link</a></td></tr>"#
                )
                .to_string(),
                code_row("A1"),
            ]),
        )
        .with_page(&detail_url("A1"), &detail(&["B1"]));
        let mut coordinator = Coordinator::new(test_config(), fetcher).unwrap();

        let records = coordinator.crawl_combinations(1).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].code, "A1");
        assert_eq!(coordinator.observer().rows_without_link, 1);
    }

    #[tokio::test]
    async fn test_detail_fetch_failure_aborts() {
        let fetcher = FakeFetcher::new()
            .with_page(&listing_page_url(0), &listing(&[code_row("A1")]));
        let mut coordinator = Coordinator::new(test_config(), fetcher).unwrap();

        let result = coordinator.crawl_combinations(1).await;

        match result {
            Err(CcsdError::Fetch(FetchError::Status { url, status })) => {
                assert_eq!(url, detail_url("A1"));
                assert_eq!(status, 404);
            }
            other => panic!("expected fetch error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_listing_without_table_aborts() {
        let fetcher = FakeFetcher::new()
            .with_page(&listing_page_url(0), "<html><body>Down for maintenance</body></html>");
        let mut coordinator = Coordinator::new(test_config(), fetcher).unwrap();

        assert!(matches!(
            coordinator.crawl_schedule(1).await,
            Err(CcsdError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_run_applies_max_pages() {
        let discovery = discovery_url(&Config::default().site).unwrap().to_string();
        let fetcher = two_page_fetcher().with_page(
            &discovery,
            r#"<html><body><div class="pagination">1 2 ... 002</div></body></html>"#,
        );
        let mut config = test_config();
        config.crawler.max_pages = Some(1);
        let mut coordinator = Coordinator::new(config, fetcher).unwrap();

        let output = coordinator.run(false).await.unwrap();

        assert_eq!(output.page_count, 1);
        assert_eq!(output.schedule.len(), 3);
    }

    /// Records when each listing page and detail page arrives, in virtual time
    struct Timeline {
        start: tokio::time::Instant,
        events: Vec<(String, u64)>,
    }

    impl Timeline {
        fn new() -> Self {
            Self {
                start: tokio::time::Instant::now(),
                events: Vec::new(),
            }
        }

        fn record(&mut self, event: String) {
            let elapsed = self.start.elapsed().as_millis() as u64;
            self.events.push((event, elapsed));
        }

        /// Event times rounded to the nearest 10 ms
        fn at(&self) -> Vec<(&str, u64)> {
            self.events
                .iter()
                .map(|(event, ms)| (event.as_str(), (ms + 5) / 10 * 10))
                .collect()
        }
    }

    impl CrawlObserver for Timeline {
        fn page_done(&mut self, page: u32, _rows: usize) {
            self.record(format!("page {}", page));
        }

        fn detail_fetched(&mut self, code: &str, _combinations: usize) {
            self.record(format!("detail {}", code));
        }
    }

    fn delayed_config(two_pass: bool) -> Config {
        let mut config = Config::default();
        config.crawler.page_delay_ms = 500;
        config.crawler.combination_delay_ms = 300;
        config.crawler.two_pass = two_pass;
        config
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_pass_delay_placement() {
        let mut coordinator =
            Coordinator::with_observer(delayed_config(false), two_page_fetcher(), Timeline::new())
                .unwrap();

        coordinator.crawl(2, true).await.unwrap();

        assert_eq!(
            coordinator.observer().at(),
            vec![
                ("page 0", 0),
                ("detail A1", 500),
                ("detail A2", 500),
                ("detail A3", 500),
                ("page 1", 800),
            ]
        );
        let total = coordinator.observer().start.elapsed();
        assert!(total >= Duration::from_millis(1600) && total < Duration::from_millis(1650));
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_pass_delay_placement() {
        let mut coordinator =
            Coordinator::with_observer(delayed_config(true), two_page_fetcher(), Timeline::new())
                .unwrap();

        coordinator.crawl(2, true).await.unwrap();

        assert_eq!(
            coordinator.observer().at(),
            vec![
                ("page 0", 0),
                ("page 1", 500),
                ("page 0", 1000),
                ("detail A1", 1000),
                ("detail A2", 1000),
                ("detail A3", 1000),
                ("page 1", 1300),
            ]
        );
        let total = coordinator.observer().start.elapsed();
        assert!(total >= Duration::from_millis(1600) && total < Duration::from_millis(1650));
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedule_only_waits_page_delay_alone() {
        let mut coordinator =
            Coordinator::with_observer(delayed_config(false), two_page_fetcher(), Timeline::new())
                .unwrap();

        coordinator.crawl(2, false).await.unwrap();

        assert_eq!(coordinator.observer().at(), vec![("page 0", 0), ("page 1", 500)]);
    }

    #[tokio::test]
    async fn test_fill_forward_policy_reaches_records() {
        let fetcher = FakeFetcher::new().with_page(
            &listing_page_url(0),
            &listing(&[
                code_row("A1"),
                r#"<tr><td><a class="greenButt butt1">A2</a></td></tr>"#.to_string(),
            ]),
        );
        let mut config = test_config();
        config.crawler.missing_fields = MissingFieldPolicy::FillForward;
        let mut coordinator = Coordinator::new(config, fetcher).unwrap();

        let records = coordinator.crawl_schedule(1).await.unwrap();

        assert_eq!(records[1].chapter, "Chapter of A1");
        assert_eq!(records[1].guidance, "Guidance for A1");
        assert_eq!(records[1].description, "");
    }
}
