//! Batched record writer
//!
//! Buffers harvested records and hands them to the sink in one write once the
//! batch threshold is reached or the run ends.

use crate::article::ArticleRecord;
use crate::output::traits::{OutputResult, RecordSink};

/// Buffer of records awaiting a flush to a [`RecordSink`]
#[derive(Debug)]
pub struct BatchWriter<S> {
    sink: S,
    buffer: Vec<ArticleRecord>,
    batch_size: usize,
    flushed_rows: u64,
}

impl<S: RecordSink> BatchWriter<S> {
    /// Creates a writer that considers itself full at `batch_size` records
    pub fn new(sink: S, batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            sink,
            buffer: Vec::with_capacity(batch_size),
            batch_size,
            flushed_rows: 0,
        }
    }

    /// Buffers a record
    pub fn append(&mut self, record: ArticleRecord) {
        self.buffer.push(record);
    }

    /// Number of buffered records
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns true once the buffer reached the batch threshold
    pub fn is_full(&self) -> bool {
        self.buffer.len() >= self.batch_size
    }

    /// Total rows handed to the sink so far
    pub fn flushed_rows(&self) -> u64 {
        self.flushed_rows
    }

    /// The underlying sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Writes the whole buffer to the sink and clears it
    ///
    /// Returns the number of rows written. On error the buffer is kept so the
    /// caller can still report what was lost.
    pub fn flush(&mut self) -> OutputResult<usize> {
        if self.buffer.is_empty() {
            return Ok(0);
        }

        self.sink.append_rows(&self.buffer)?;

        let written = self.buffer.len();
        self.flushed_rows += written as u64;
        self.buffer.clear();

        tracing::debug!("Flushed {} records to {}", written, self.sink.describe());
        Ok(written)
    }
}
