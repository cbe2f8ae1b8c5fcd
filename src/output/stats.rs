//! Per-run harvest statistics
//!
//! Missing pages and template mismatches are silent skips, so the success
//! ratio printed here is the operator's only signal of a source-side block.

use crate::article::ArticleId;
use crate::state::PageOutcome;
use std::collections::BTreeMap;

/// Counters for one harvest run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatistics {
    /// First ID of the run
    pub start_id: ArticleId,

    /// Last ID of the range
    pub end_id: ArticleId,

    /// IDs processed
    pub processed: u64,

    /// IDs that produced a record
    pub harvested: u64,

    /// Skipped IDs by reason label
    pub skipped: BTreeMap<&'static str, u64>,

    /// Rows written to the output table
    pub rows_written: u64,

    /// Whether the run stopped before reaching the end of the range
    pub interrupted: bool,
}

impl RunStatistics {
    /// Creates empty statistics for the given range
    pub fn new(start_id: ArticleId, end_id: ArticleId) -> Self {
        Self {
            start_id,
            end_id,
            ..Default::default()
        }
    }

    /// Counts one processed ID
    pub fn record(&mut self, outcome: &PageOutcome) {
        self.processed += 1;
        match outcome {
            PageOutcome::Harvested(_) => self.harvested += 1,
            PageOutcome::Skipped(reason) => {
                *self.skipped.entry(reason.kind()).or_insert(0) += 1;
            }
        }
    }

    /// Total skipped IDs
    pub fn total_skipped(&self) -> u64 {
        self.skipped.values().sum()
    }

    /// Percentage of processed IDs that produced a record
    pub fn success_rate(&self) -> f64 {
        if self.processed == 0 {
            return 0.0;
        }
        (self.harvested as f64 / self.processed as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &RunStatistics) {
    println!("=== Harvest Statistics ===\n");

    println!("Range: {} .. {}", stats.start_id, stats.end_id);
    if stats.interrupted {
        println!("Run interrupted before the end of the range");
    }
    println!("  IDs processed: {}", stats.processed);
    println!("  Records harvested: {}", stats.harvested);
    println!("  Rows written: {}", stats.rows_written);
    println!();

    if !stats.skipped.is_empty() {
        println!("Skipped ({}):", stats.total_skipped());
        let mut counts: Vec<_> = stats.skipped.iter().collect();
        counts.sort_by(|a, b| b.1.cmp(a.1));
        for (reason, count) in counts {
            println!("  {}: {}", reason, count);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} IDs harvested)",
        stats.success_rate(),
        stats.harvested,
        stats.processed
    );
}
