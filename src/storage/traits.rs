//! Checkpoint storage traits and error types

use crate::article::ArticleId;
use thiserror::Error;

/// ID the crawl starts from when no checkpoint exists
pub const DEFAULT_START_ID: ArticleId = 1;

/// Errors that can occur while persisting a checkpoint
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to write checkpoint {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Persists the last accounted-for article ID
///
/// The stored value is the highest ID whose outcome, success or failure, has
/// been accounted for. Reads never fail the process; writes overwrite.
pub trait CheckpointStore {
    /// Loads the stored checkpoint
    ///
    /// Returns `None` when the checkpoint is absent or unreadable.
    fn load(&self) -> Option<ArticleId>;

    /// Persists a new checkpoint, replacing the previous one
    fn write(&mut self, id: ArticleId) -> StorageResult<()>;

    /// Reads the checkpoint, defaulting to [`DEFAULT_START_ID`]
    fn read(&self) -> ArticleId {
        self.load().unwrap_or(DEFAULT_START_ID)
    }

    /// Returns the first ID a resumed run should process
    fn resume_from(&self) -> ArticleId {
        match self.load() {
            Some(last) => last.saturating_add(1).max(DEFAULT_START_ID),
            None => DEFAULT_START_ID,
        }
    }
}
