//! CSV persistence for schedule and combination records
//!
//! Both files start with an unnamed row-index column counting from zero.
//! Combination records are exploded before writing, so the index counts
//! (code, combination) pairs.

use crate::model::{explode_combinations, CombinationRecord, CombinationRow, ScheduleRecord};
use crate::output::{OutputError, OutputResult};
use std::fs;
use std::io;
use std::path::Path;

pub const SCHEDULE_HEADER: [&str; 5] = ["", "code", "description", "chapter", "guidance"];
pub const COMBINATIONS_HEADER: [&str; 3] = ["", "code", "unacceptable combinations"];

/// Writes the schedule to `path`, replacing any existing file
pub fn write_schedule(path: &Path, records: &[ScheduleRecord]) -> OutputResult<()> {
    ensure_parent_dir(path)?;
    let file = fs::File::create(path)?;
    write_schedule_to(file, records)?;
    tracing::info!("Wrote {} schedule rows to {}", records.len(), path.display());
    Ok(())
}

/// Writes the schedule as CSV to any writer
pub fn write_schedule_to<W: io::Write>(writer: W, records: &[ScheduleRecord]) -> OutputResult<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(SCHEDULE_HEADER)?;

    for (index, record) in records.iter().enumerate() {
        out.write_record([
            index.to_string().as_str(),
            record.code.as_str(),
            record.description.as_str(),
            record.chapter.as_str(),
            record.guidance.as_str(),
        ])?;
    }

    out.flush()?;
    Ok(())
}

/// Explodes the combination records and writes them to `path`
///
/// Returns the number of rows written.
pub fn write_combinations(path: &Path, records: &[CombinationRecord]) -> OutputResult<usize> {
    ensure_parent_dir(path)?;
    let file = fs::File::create(path)?;
    let rows = write_combinations_to(file, records)?;
    tracing::info!(
        "Wrote {} combination rows for {} codes to {}",
        rows,
        records.len(),
        path.display()
    );
    Ok(rows)
}

/// Explodes the combination records and writes them as CSV to any writer
pub fn write_combinations_to<W: io::Write>(
    writer: W,
    records: &[CombinationRecord],
) -> OutputResult<usize> {
    let rows = explode_combinations(records);
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(COMBINATIONS_HEADER)?;

    for (index, row) in rows.iter().enumerate() {
        out.write_record([
            index.to_string().as_str(),
            row.code.as_str(),
            row.combination.as_str(),
        ])?;
    }

    out.flush()?;
    Ok(rows.len())
}

/// Reads a schedule file back as (row index, record) pairs
pub fn read_schedule(path: &Path) -> OutputResult<Vec<(u64, ScheduleRecord)>> {
    let mut reader = csv::Reader::from_path(path)?;
    check_header(reader.headers()?, &SCHEDULE_HEADER)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let index = parse_index(&row)?;
        records.push((
            index,
            ScheduleRecord {
                code: row[1].to_string(),
                description: row[2].to_string(),
                chapter: row[3].to_string(),
                guidance: row[4].to_string(),
            },
        ));
    }

    Ok(records)
}

/// Reads an exploded combinations file back as (row index, row) pairs
pub fn read_combinations(path: &Path) -> OutputResult<Vec<(u64, CombinationRow)>> {
    let mut reader = csv::Reader::from_path(path)?;
    check_header(reader.headers()?, &COMBINATIONS_HEADER)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let row = result?;
        let index = parse_index(&row)?;
        rows.push((
            index,
            CombinationRow {
                code: row[1].to_string(),
                combination: row[2].to_string(),
            },
        ));
    }

    Ok(rows)
}

fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

fn check_header(found: &csv::StringRecord, expected: &[&str]) -> OutputResult<()> {
    if found.iter().eq(expected.iter().copied()) {
        Ok(())
    } else {
        Err(OutputError::Format(format!(
            "Unexpected header {:?}, expected {:?}",
            found, expected
        )))
    }
}

fn parse_index(row: &csv::StringRecord) -> OutputResult<u64> {
    row[0]
        .parse()
        .map_err(|_| OutputError::Format(format!("Invalid row index '{}'", &row[0])))
}
