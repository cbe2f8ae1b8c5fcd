//! Archive-Harvest: a resumable ID-range news archive harvester
//!
//! This crate walks a numerically-addressed article archive one ID at a time,
//! extracts structured records with site-specific selector profiles, and
//! appends them to a tabular output while checkpointing its progress.

pub mod article;
pub mod config;
pub mod crawler;
pub mod output;
pub mod profile;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Archive-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid article URL for id {id}: {message}")]
    ArticleUrl { id: article::ArticleId, message: String },

    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] storage::StorageError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL template: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector for field '{field}': {message}")]
    InvalidSelector { field: String, message: String },

    #[error("Unknown profile preset: {0}")]
    UnknownPreset(String),
}

/// Result type alias for Archive-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use article::{ArticleField, ArticleId, ArticleRecord};
pub use config::Config;
pub use profile::FieldSelectorProfile;
pub use state::{PageOutcome, SkipReason};
