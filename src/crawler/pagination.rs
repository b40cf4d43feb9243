//! Page-count discovery from the listing's pagination indicator

use crate::crawler::fetcher::Fetch;
use crate::ParseError;
use scraper::{Html, Selector};
use url::Url;

const PAGINATION: &str = "div.pagination";

/// Width of the page number at the end of the pagination text
const PAGE_NUMBER_WIDTH: usize = 3;

/// Reads the total page count from a listing page
///
/// The indicator's text ends with the highest page number; its last three
/// characters are parsed as a base-10 integer, so `"… 012"` yields 12 and a
/// shorter number such as `"… 45"` is still read correctly once the
/// surrounding whitespace is trimmed.
///
/// # Returns
///
/// * `Ok(u32)` - The number of listing pages
/// * `Err(ParseError)` - The indicator is missing or does not end in a number
pub fn parse_page_count(html: &str) -> Result<u32, ParseError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(PAGINATION).map_err(|_| ParseError::Selector(PAGINATION))?;

    let indicator = document
        .select(&selector)
        .next()
        .ok_or_else(|| ParseError::MissingElement {
            selector: PAGINATION,
            context: "listing page".to_string(),
        })?;

    let text = indicator.text().collect::<String>();
    let text = text.trim_end();

    let tail_start = text
        .char_indices()
        .rev()
        .nth(PAGE_NUMBER_WIDTH - 1)
        .map(|(index, _)| index)
        .unwrap_or(0);
    let tail = text[tail_start..].trim();

    tail.parse::<u32>()
        .map_err(|_| ParseError::InvalidPageCount {
            text: text.to_string(),
        })
}

/// Fetches the base listing page once and derives the page count
///
/// No further requests are made, whether or not the count can be read.
pub async fn discover_page_count<F: Fetch>(fetcher: &F, listing_url: &Url) -> crate::Result<u32> {
    let html = fetcher.fetch(listing_url).await?;
    let count = parse_page_count(&html)?;
    tracing::info!("Discovered {} listing pages", count);
    Ok(count)
}
