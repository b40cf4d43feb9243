use serde::Deserialize;
use std::time::Duration;

/// The user-agent sent on every request unless overridden
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_10_1) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/39.0.2171.95 Safari/537.36";

/// Main configuration structure for ccsd-scrape
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub http: HttpConfig,
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
}

/// Where the schedule lives and which slice of it to list
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Scheme and host of the site, detail links are resolved against it
    pub origin: String,

    /// Path of the schedule listing page
    #[serde(rename = "listing-path")]
    pub listing_path: String,

    /// Value of the `ctype` query parameter
    #[serde(rename = "schedule-type")]
    pub schedule_type: u32,

    /// Rows per listing page (`numitems`)
    #[serde(rename = "page-size")]
    pub page_size: u32,

    /// Whether inactive codes are listed (`inactives`)
    #[serde(rename = "include-inactive")]
    pub include_inactive: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            origin: "https://www.ccsd.org.uk".to_string(),
            listing_path: "/ccsdschedule/CCSDScheduleCode".to_string(),
            schedule_type: 3,
            page_size: 20,
            include_inactive: true,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
        }
    }
}

/// How a missing chapter or guidance cell is filled in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingFieldPolicy {
    /// Missing values become empty strings
    #[default]
    Empty,
    /// Missing values repeat the previous row's value
    FillForward,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Pause after each listing page fetch (milliseconds)
    #[serde(rename = "page-delay-ms")]
    pub page_delay_ms: u64,

    /// Pause after each listing page's detail fetches (milliseconds)
    #[serde(rename = "combination-delay-ms")]
    pub combination_delay_ms: u64,

    /// Upper bound on the number of listing pages crawled
    #[serde(rename = "max-pages")]
    pub max_pages: Option<u32>,

    /// Fetch every listing page twice, once per result set
    #[serde(rename = "two-pass")]
    pub two_pass: bool,

    /// Policy for rows lacking a chapter or guidance value
    #[serde(rename = "missing-fields")]
    pub missing_fields: MissingFieldPolicy,
}

impl CrawlerConfig {
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn combination_delay(&self) -> Duration {
        Duration::from_millis(self.combination_delay_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            page_delay_ms: 500,
            combination_delay_ms: 300,
            max_pages: None,
            two_pass: false,
            missing_fields: MissingFieldPolicy::Empty,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the schedule CSV
    #[serde(rename = "schedule-path")]
    pub schedule_path: String,

    /// Path of the unacceptable combinations CSV
    #[serde(rename = "combinations-path")]
    pub combinations_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            schedule_path: "ccsd.csv".to_string(),
            combinations_path: "unacceptable_combinations.csv".to_string(),
        }
    }
}
