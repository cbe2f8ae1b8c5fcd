//! Loop-local state of a harvest run
//!
//! The crawl loop owns one `CrawlState` and passes it between its steps, so
//! counters and timers never live in process-wide variables.

use crate::article::ArticleId;
use crate::output::RunStatistics;
use crate::state::PageOutcome;
use std::time::{Duration, Instant};

/// Mutable bookkeeping for one pass over `[start_id, end_id]`
#[derive(Debug)]
pub struct CrawlState {
    /// Next ID to process
    current_id: ArticleId,

    /// Last ID to process (inclusive)
    end_id: ArticleId,

    /// Last ID whose outcome has been recorded
    last_processed: Option<ArticleId>,

    /// Elapsed time accumulated over closed accounting windows
    total_elapsed: Duration,

    /// Start of the current accounting window
    window_start: Instant,

    /// Outcome counters for this run
    pub stats: RunStatistics,
}

impl CrawlState {
    /// Creates the state for a run starting at `start_id`
    pub fn new(start_id: ArticleId, end_id: ArticleId) -> Self {
        Self {
            current_id: start_id,
            end_id,
            last_processed: None,
            total_elapsed: Duration::ZERO,
            window_start: Instant::now(),
            stats: RunStatistics::new(start_id, end_id),
        }
    }

    /// The next ID to process
    pub fn current_id(&self) -> ArticleId {
        self.current_id
    }

    /// The last ID of the range
    pub fn end_id(&self) -> ArticleId {
        self.end_id
    }

    /// The last ID whose outcome has been recorded
    pub fn last_processed(&self) -> Option<ArticleId> {
        self.last_processed
    }

    /// Returns true once every ID in the range has been processed
    pub fn is_done(&self) -> bool {
        self.current_id > self.end_id
    }

    /// Records the outcome of the current ID and advances to the next one
    ///
    /// The ID is consumed whatever the outcome.
    pub fn record(&mut self, outcome: &PageOutcome) {
        self.stats.record(outcome);
        self.last_processed = Some(self.current_id);
        self.current_id += 1;
    }

    /// Total number of IDs processed in this run
    pub fn processed(&self) -> u64 {
        self.stats.processed
    }

    /// Returns true if the processed count sits on an accounting boundary
    pub fn at_accounting_boundary(&self, interval: u64) -> bool {
        interval > 0 && self.stats.processed > 0 && self.stats.processed % interval == 0
    }

    /// Closes the current timing window and starts a new one
    ///
    /// Returns the total elapsed time over all closed windows.
    pub fn close_window(&mut self) -> Duration {
        let now = Instant::now();
        self.total_elapsed += now.duration_since(self.window_start);
        self.window_start = now;
        self.total_elapsed
    }

    /// Elapsed time over all closed windows
    pub fn total_elapsed(&self) -> Duration {
        self.total_elapsed
    }
}
