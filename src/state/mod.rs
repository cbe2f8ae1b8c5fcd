//! State module for tracking harvest progress
//!
//! # Components
//!
//! - `PageOutcome`: Outcome of one article ID (harvested record or skip reason)
//! - `CrawlState`: Loop-local counters, timers and the current ID of a run

mod crawl_state;
mod outcome;

// Re-export main types
pub use crawl_state::CrawlState;
pub use outcome::{PageOutcome, SkipReason};
