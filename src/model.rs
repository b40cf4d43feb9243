//! Record types produced by a crawl
//!
//! - `ListingRow`: what one listing-table row yielded, field by field
//! - `ScheduleRecord`: one schedule entry per code
//! - `CombinationRecord`: a code and the codes it must not be combined with
//! - `CombinationRow`: the one-row-per-combination form written to disk

/// One row of a listing page, before any policy for missing values is applied
///
/// Every field is `None` when the corresponding markup was absent from the row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingRow {
    /// Text of the active/inactive code button
    pub code: Option<String>,

    /// Text of the first code link
    pub description: Option<String>,

    /// Text of the second code link
    pub chapter: Option<String>,

    /// Trimmed text of the fourth cell
    pub guidance: Option<String>,

    /// `href` of the first code link, pointing at the code's detail page
    pub detail_href: Option<String>,
}

/// One entry of the CCSD schedule
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleRecord {
    pub code: String,
    pub description: String,
    pub chapter: String,
    pub guidance: String,
}

/// A code and the ordered list of codes it forms an unacceptable combination with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombinationRecord {
    pub code: String,
    pub combinations: Vec<String>,
}

/// A single (code, combination) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinationRow {
    pub code: String,
    pub combination: String,
}

impl CombinationRecord {
    /// Expands the record into one row per combination, in order
    ///
    /// A record without combinations still yields one row, with an empty
    /// combination, so that every crawled code appears in the output.
    ///
    /// # Examples
    ///
    /// ```
    /// use ccsd_scrape::model::CombinationRecord;
    ///
    /// let record = CombinationRecord {
    ///     code: "X123".to_string(),
    ///     combinations: vec![],
    /// };
    /// let rows = record.explode();
    /// assert_eq!(rows.len(), 1);
    /// assert_eq!(rows[0].combination, "");
    /// ```
    pub fn explode(&self) -> Vec<CombinationRow> {
        if self.combinations.is_empty() {
            return vec![CombinationRow {
                code: self.code.clone(),
                combination: String::new(),
            }];
        }

        self.combinations
            .iter()
            .map(|combination| CombinationRow {
                code: self.code.clone(),
                combination: combination.clone(),
            })
            .collect()
    }
}

/// Expands every record, preserving record order then combination order
pub fn explode_combinations(records: &[CombinationRecord]) -> Vec<CombinationRow> {
    records.iter().flat_map(CombinationRecord::explode).collect()
}
