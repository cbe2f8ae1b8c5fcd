//! Output module for harvested records and run reporting
//!
//! This module handles:
//! - Appending records to CSV or SQLite tables
//! - Batching records between flushes
//! - Progress/ETA estimation and end-of-run statistics

mod batch;
mod csv_output;
pub mod progress;
mod sqlite_output;
pub mod stats;
mod traits;

pub use batch::BatchWriter;
pub use csv_output::CsvSink;
pub use progress::ProgressReport;
pub use sqlite_output::SqliteSink;
pub use stats::{print_statistics, RunStatistics};
pub use traits::{OutputError, OutputResult, RecordSink};

use crate::config::{OutputConfig, OutputFormat};

/// Opens the record sink described by the output configuration
///
/// # Arguments
///
/// * `config` - The output configuration
///
/// # Returns
///
/// A boxed sink; nothing is opened on disk until the first flush.
pub fn open_sink(config: &OutputConfig) -> Box<dyn RecordSink> {
    match config.format {
        OutputFormat::Csv => Box::new(CsvSink::new(&config.path, config.byte_order_mark)),
        OutputFormat::Sqlite => Box::new(SqliteSink::new(&config.path)),
    }
}
