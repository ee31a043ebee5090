use std::io;
use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Failures a planner operation can hand back to its caller.
///
/// Loading never appears here: a missing or malformed document degrades to
/// the empty document instead of failing the session.
#[derive(Debug, Error)]
pub enum Error {
    #[error("storage unavailable at {path}: {source}")]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no task at position {index} for {date}: the day has {len} task(s)")]
    OutOfRange {
        date: NaiveDate,
        index: usize,
        len: usize,
    },

    #[error("no project at position {index}: the board has {len} project(s)")]
    ProjectOutOfRange { index: usize, len: usize },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
