//! HTML extraction for listing and detail pages
//!
//! Listing-page rows are heterogeneous: a code row carries a code button and
//! two code links, while header and separator rows carry some or none of
//! them. Extraction therefore never fails on a row; each field is looked up
//! on its own and recorded as `None` when its markup is absent.

use crate::model::ListingRow;
use crate::ParseError;
use scraper::{ElementRef, Html, Selector};

/// Either code button: `butt1` marks an active code, `butt0` an inactive one
const CODE_BUTTON: &str = "a.greenButt.butt1, a.greenButt.butt0";
const CODE_LINK: &str = "a.codelink";
const TABLE: &str = "table";
const ROW: &str = "tr";
const CELL: &str = "td";
const COMBINATION_TABLE: &str = "table.codeTr";

/// Cell holding free-text guidance such as "This code replaces XXXX"
const GUIDANCE_CELL: usize = 3;

/// Code link holding the chapter, after the description link
const CHAPTER_LINK: usize = 1;

fn selector(css: &'static str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|_| ParseError::Selector(css))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// The four parallel column lists derived from a listing page's rows
///
/// `codes` and `descriptions` only hold the values that were present, so
/// their lengths may differ from each other and from the row count.
/// `chapters` and `guidance` hold one entry per row, `None` where the value
/// was missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleColumns {
    pub codes: Vec<String>,
    pub descriptions: Vec<String>,
    pub chapters: Vec<Option<String>>,
    pub guidance: Vec<Option<String>>,
}

impl ScheduleColumns {
    /// Splits extracted rows into column lists, preserving row order
    pub fn from_rows(rows: &[ListingRow]) -> Self {
        Self {
            codes: rows.iter().filter_map(|r| r.code.clone()).collect(),
            descriptions: rows.iter().filter_map(|r| r.description.clone()).collect(),
            chapters: rows.iter().map(|r| r.chapter.clone()).collect(),
            guidance: rows.iter().map(|r| r.guidance.clone()).collect(),
        }
    }
}

/// Extracts the body rows of the first table on a listing page
///
/// The first `tr` is the table header and is skipped.
///
/// # Arguments
///
/// * `html` - The listing page markup
/// * `source` - Where the markup came from, used in error messages
///
/// # Returns
///
/// * `Ok(Vec<ListingRow>)` - One entry per body row, in document order
/// * `Err(ParseError)` - The page has no table
pub fn parse_listing(html: &str, source: &str) -> Result<Vec<ListingRow>, ParseError> {
    let document = Html::parse_document(html);
    let table_selector = selector(TABLE)?;
    let row_selector = selector(ROW)?;

    let table = document
        .select(&table_selector)
        .next()
        .ok_or_else(|| ParseError::MissingElement {
            selector: TABLE,
            context: source.to_string(),
        })?;

    let extractor = RowExtractor::new()?;

    Ok(table
        .select(&row_selector)
        .skip(1)
        .map(|row| extractor.extract(row))
        .collect())
}

/// Extracts the unacceptable combinations listed on a code's detail page
///
/// Returns the text of every code button inside the combinations table, in
/// document order. A page without that table lists no combinations.
pub fn parse_combinations(html: &str) -> Result<Vec<String>, ParseError> {
    let document = Html::parse_document(html);
    let table_selector = selector(COMBINATION_TABLE)?;
    let button_selector = selector(CODE_BUTTON)?;

    let Some(table) = document.select(&table_selector).next() else {
        tracing::debug!("Detail page has no combinations table");
        return Ok(Vec::new());
    };

    Ok(table.select(&button_selector).map(element_text).collect())
}

/// Per-row field extraction rules
struct RowExtractor {
    code_button: Selector,
    code_link: Selector,
    cell: Selector,
}

impl RowExtractor {
    fn new() -> Result<Self, ParseError> {
        Ok(Self {
            code_button: selector(CODE_BUTTON)?,
            code_link: selector(CODE_LINK)?,
            cell: selector(CELL)?,
        })
    }

    fn extract(&self, row: ElementRef<'_>) -> ListingRow {
        let code = row.select(&self.code_button).next().map(element_text);

        let links: Vec<ElementRef<'_>> = row.select(&self.code_link).collect();
        let description = links.first().copied().map(element_text);
        let chapter = links.get(CHAPTER_LINK).copied().map(element_text);
        let detail_href = links
            .first()
            .and_then(|link| link.value().attr("href"))
            .map(str::to_string);

        let guidance = row.select(&self.cell).nth(GUIDANCE_CELL).map(element_text);

        ListingRow {
            code,
            description,
            chapter,
            guidance,
            detail_href,
        }
    }
}
