//! Configuration module for Archive-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use archive_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("configs/cnyes.toml")).unwrap();
//! println!("Harvesting up to id {}", config.crawler.end_id);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, FieldConfig, HttpConfig, OutputConfig, OutputFormat, ProfileConfig,
    SourceConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};

// Re-export range checks for run-level overrides
pub use validation::{validate_id_range, MAX_END_ID};
