//! Folding listing rows into schedule records

use crate::config::MissingFieldPolicy;
use crate::model::{ListingRow, ScheduleRecord};
use crate::output::{CrawlObserver, SkipReason};

/// Schedule records gathered so far in one crawl pass
///
/// Each page is folded in with [`ScheduleAccumulator::absorb_page`], which
/// takes the accumulator by value and hands it back, so the only state
/// carried between pages is what this struct holds.
#[derive(Debug, Clone, Default)]
pub struct ScheduleAccumulator {
    policy: MissingFieldPolicy,
    last_chapter: Option<String>,
    last_guidance: Option<String>,
    records: Vec<ScheduleRecord>,
}

impl ScheduleAccumulator {
    pub fn new(policy: MissingFieldPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Appends one record per row that carries a code, in row order
    ///
    /// Rows without a code are reported to `observer` and skipped. A missing
    /// description is written empty; a missing chapter or guidance follows
    /// the configured [`MissingFieldPolicy`]. Under `FillForward` the last
    /// value seen on any row, coded or not, is reused.
    pub fn absorb_page<O: CrawlObserver>(
        mut self,
        page: u32,
        rows: &[ListingRow],
        observer: &mut O,
    ) -> Self {
        for (index, row) in rows.iter().enumerate() {
            let chapter = self.resolve_chapter(row.chapter.as_deref());
            let guidance = self.resolve_guidance(row.guidance.as_deref());

            let Some(code) = &row.code else {
                observer.row_skipped(page, index, &SkipReason::NoCode);
                continue;
            };

            self.records.push(ScheduleRecord {
                code: code.clone(),
                description: row.description.clone().unwrap_or_default(),
                chapter,
                guidance,
            });
        }

        self
    }

    /// Number of records gathered so far
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<ScheduleRecord> {
        self.records
    }

    fn resolve_chapter(&mut self, value: Option<&str>) -> String {
        fill(self.policy, &mut self.last_chapter, value)
    }

    fn resolve_guidance(&mut self, value: Option<&str>) -> String {
        fill(self.policy, &mut self.last_guidance, value)
    }
}

fn fill(policy: MissingFieldPolicy, last: &mut Option<String>, value: Option<&str>) -> String {
    match (value, policy) {
        (Some(value), _) => {
            *last = Some(value.to_string());
            value.to_string()
        }
        (None, MissingFieldPolicy::Empty) => String::new(),
        (None, MissingFieldPolicy::FillForward) => last.clone().unwrap_or_default(),
    }
}
