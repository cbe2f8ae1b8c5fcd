//! Storage module for persisting harvest progress
//!
//! The only durable progress state is the checkpoint: the last article ID
//! whose outcome has been accounted for.

mod checkpoint;
mod traits;

pub use checkpoint::FileCheckpointStore;
pub use traits::{CheckpointStore, StorageError, StorageResult, DEFAULT_START_ID};

use std::path::Path;

/// Opens the checkpoint store at the given path
pub fn open_checkpoint(path: &Path) -> FileCheckpointStore {
    FileCheckpointStore::new(path)
}
