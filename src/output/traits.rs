//! Output sink trait and error types

use crate::article::ArticleRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Append-only table of article records
///
/// Implementations open their backing store for each call and release it
/// before returning, so rows written by a completed call survive a crash of
/// the process.
pub trait RecordSink {
    /// Appends all records as new rows, in order, in a single write
    fn append_rows(&mut self, records: &[ArticleRecord]) -> OutputResult<()>;

    /// Short description of the sink, used in logs
    fn describe(&self) -> String;
}

impl<S: RecordSink + ?Sized> RecordSink for Box<S> {
    fn append_rows(&mut self, records: &[ArticleRecord]) -> OutputResult<()> {
        (**self).append_rows(records)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
