//! URL handling module for ccsd-scrape
//!
//! This module builds the listing-page URLs the crawl walks through and
//! resolves per-code detail links against the site origin.

mod resolve;

use crate::config::SiteConfig;
use url::Url;

pub use resolve::resolve_detail_link;

/// Parses the configured origin into a base URL
pub fn origin_url(site: &SiteConfig) -> Result<Url, url::ParseError> {
    Url::parse(&site.origin)
}

/// Builds the base listing URL used for page-count discovery
///
/// This URL carries no page parameter; the site answers with its first page
/// and the pagination indicator.
///
/// # Examples
///
/// ```
/// use ccsd_scrape::config::SiteConfig;
/// use ccsd_scrape::url::discovery_url;
///
/// let url = discovery_url(&SiteConfig::default()).unwrap();
/// assert_eq!(
///     url.as_str(),
///     "https://www.ccsd.org.uk/ccsdschedule/CCSDScheduleCode?ctype=3&inactives=1&searchvalue="
/// );
/// ```
pub fn discovery_url(site: &SiteConfig) -> Result<Url, url::ParseError> {
    let mut url = origin_url(site)?.join(&site.listing_path)?;
    url.query_pairs_mut()
        .append_pair("ctype", &site.schedule_type.to_string())
        .append_pair("inactives", inactive_flag(site))
        .append_pair("searchvalue", "");
    Ok(url)
}

/// Builds the URL of one zero-based listing page
///
/// The search filters are sent empty so that the whole schedule is listed.
pub fn listing_url(site: &SiteConfig, page: u32) -> Result<Url, url::ParseError> {
    let mut url = origin_url(site)?.join(&site.listing_path)?;
    url.query_pairs_mut()
        .append_pair("rt", "")
        .append_pair("st", "")
        .append_pair("Chapter", "")
        .append_pair("Section", "")
        .append_pair("Subsection", "")
        .append_pair("page", &page.to_string())
        .append_pair("ctype", &site.schedule_type.to_string())
        .append_pair("numitems", &site.page_size.to_string())
        .append_pair("searchvalue", "")
        .append_pair("inactives", inactive_flag(site));
    Ok(url)
}

fn inactive_flag(site: &SiteConfig) -> &'static str {
    if site.include_inactive {
        "1"
    } else {
        "0"
    }
}
