//! CSV output sink
//!
//! Rows of the five record fields, no header. The file is opened in append
//! mode for every batch and closed once the batch is written.

use crate::article::ArticleRecord;
use crate::output::traits::{OutputResult, RecordSink};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Append-mode CSV table
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
    byte_order_mark: bool,
}

impl CsvSink {
    /// Creates a sink writing to `path`
    ///
    /// With `byte_order_mark` set, a UTF-8 BOM is written when the file is
    /// created so spreadsheet tools detect the encoding.
    pub fn new(path: impl Into<PathBuf>, byte_order_mark: bool) -> Self {
        Self {
            path: path.into(),
            byte_order_mark,
        }
    }

    /// Path of the CSV file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for CsvSink {
    fn append_rows(&mut self, records: &[ArticleRecord]) -> OutputResult<()> {
        if records.is_empty() {
            return Ok(());
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        if self.byte_order_mark && file.metadata()?.len() == 0 {
            file.write_all(UTF8_BOM)?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        for record in records {
            writer.write_record(record.as_row())?;
        }
        writer.flush()?;

        Ok(())
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }
}
