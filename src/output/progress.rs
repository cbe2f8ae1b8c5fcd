//! Progress and remaining-time estimation
//!
//! A pure function of the run's running totals; nothing here is persisted.

use crate::article::ArticleId;
use std::fmt;
use std::time::Duration;

/// Snapshot of run progress with a projected remaining duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressReport {
    /// ID processed at the reporting boundary
    pub current: ArticleId,

    /// Last ID of the range
    pub end: ArticleId,

    /// Average time spent per processed ID
    pub average: Duration,

    /// Projected time to process the rest of the range
    pub remaining: Duration,
}

impl ProgressReport {
    /// Estimates the remaining time from cumulative totals
    ///
    /// `average = total_elapsed / total_count`, `remaining = (end - current) * average`.
    /// A zero count yields zero estimates; projections beyond `Duration::MAX`
    /// saturate.
    pub fn estimate(
        current: ArticleId,
        end: ArticleId,
        total_elapsed: Duration,
        total_count: u64,
    ) -> Self {
        let average = if total_count == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(total_elapsed.as_secs_f64() / total_count as f64)
        };

        let left = end.saturating_sub(current);
        let remaining = Duration::try_from_secs_f64(average.as_secs_f64() * left as f64)
            .unwrap_or(Duration::MAX);

        Self {
            current,
            end,
            average,
            remaining,
        }
    }

    /// Remaining time split into whole hours, minutes and seconds
    pub fn hms(&self) -> (u64, u64, u64) {
        let total = self.remaining.as_secs();
        (total / 3600, (total % 3600) / 60, total % 60)
    }

    /// Fraction of the range covered, between 0 and 100
    pub fn percent(&self) -> f64 {
        if self.end == 0 {
            return 100.0;
        }
        (self.current.min(self.end) as f64 / self.end as f64) * 100.0
    }
}

impl fmt::Display for ProgressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (hours, minutes, seconds) = self.hms();
        write!(
            f,
            "{}/{}, ETA {}h {:02}m {:02}s",
            self.current, self.end, hours, minutes, seconds
        )
    }
}
