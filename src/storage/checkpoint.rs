//! File-backed checkpoint store
//!
//! The checkpoint file holds one integer as its entire contents. Writes go to
//! a sibling temporary file that is then renamed over the checkpoint, so an
//! interrupted write leaves the previous value in place.

use crate::article::ArticleId;
use crate::storage::traits::{CheckpointStore, StorageError, StorageResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Checkpoint stored in a plain text file
#[derive(Debug, Clone)]
pub struct FileCheckpointStore {
    path: PathBuf,
}

impl FileCheckpointStore {
    /// Creates a store backed by the file at `path`
    ///
    /// The file is not touched until the first read or write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the checkpoint file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CheckpointStore for FileCheckpointStore {
    fn load(&self) -> Option<ArticleId> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No checkpoint at {}", self.path.display());
                return None;
            }
            Err(e) => {
                tracing::warn!("Failed to read checkpoint {}: {}", self.path.display(), e);
                return None;
            }
        };

        let trimmed = content.trim();
        if trimmed.is_empty() {
            return None;
        }

        match trimmed.parse::<ArticleId>() {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(
                    "Ignoring unparsable checkpoint {} ({:?}): {}",
                    self.path.display(),
                    trimmed,
                    e
                );
                None
            }
        }
    }

    fn write(&mut self, id: ArticleId) -> StorageResult<()> {
        let temp = self.temp_path();
        let to_error = |source: std::io::Error| StorageError::Write {
            path: self.path.display().to_string(),
            source,
        };

        fs::write(&temp, id.to_string()).map_err(to_error)?;
        fs::rename(&temp, &self.path).map_err(to_error)?;

        tracing::trace!("Checkpoint {} -> {}", self.path.display(), id);
        Ok(())
    }
}
