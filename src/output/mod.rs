//! Output module for persisting crawl results
//!
//! This module handles:
//! - Writing the schedule and the exploded combinations as CSV
//! - Reading those files back
//! - Recording crawl statistics through the observer hook

mod csv_output;
pub mod stats;

pub use csv_output::{
    read_combinations, read_schedule, write_combinations, write_combinations_to, write_schedule,
    write_schedule_to, COMBINATIONS_HEADER, SCHEDULE_HEADER,
};
pub use stats::{print_statistics, CrawlObserver, CrawlStatistics, SkipReason};

use crate::config::OutputConfig;
use crate::crawler::CrawlOutput;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unexpected file format: {0}")]
    Format(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Writes both result sets of a crawl to their configured paths
///
/// A crawl run without detail pages removes any combinations file left by an
/// earlier run, so the files on disk always come from the same crawl.
pub fn write_outputs(config: &OutputConfig, output: &CrawlOutput) -> OutputResult<()> {
    write_schedule(Path::new(&config.schedule_path), &output.schedule)?;

    let combinations_path = Path::new(&config.combinations_path);
    match &output.combinations {
        Some(combinations) => {
            write_combinations(combinations_path, combinations)?;
        }
        None => remove_stale(combinations_path)?,
    }

    Ok(())
}

fn remove_stale(path: &Path) -> OutputResult<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::info!("Removed combinations file from an earlier run: {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
