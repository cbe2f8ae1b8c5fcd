//! Crawler module for article fetching and extraction
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching with user-agent rotation and failure classification
//! - Field extraction with selector profiles
//! - Randomized request pacing
//! - The ID-range crawl loop

mod coordinator;
mod extractor;
mod fetcher;
mod pacing;

pub use coordinator::{run_harvest, HarvestOptions, Harvester};
pub use extractor::{extract, extract_document};
pub use fetcher::{
    build_http_client, fetch_page, pick_user_agent, FetchFailure, FetchOutcome,
    DEFAULT_USER_AGENTS,
};
pub use pacing::Pacer;
