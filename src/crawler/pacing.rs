//! Request pacing
//!
//! A randomized pause between consecutive requests keeps the request cadence
//! from being perfectly uniform.

use crate::config::CrawlerConfig;
use rand::Rng;
use std::time::Duration;

/// Randomized delay source for the crawl loop
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    min_ms: u64,
    max_ms: u64,
}

impl Pacer {
    /// Creates a pacer drawing delays from `[min_ms, max_ms]`
    ///
    /// Bounds given in the wrong order are swapped.
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min_ms: min_ms.min(max_ms),
            max_ms: min_ms.max(max_ms),
        }
    }

    /// Creates a pacer from the crawler configuration
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(config.pacing_min_ms, config.pacing_max_ms)
    }

    /// Returns true if the pacer never sleeps
    pub fn is_disabled(&self) -> bool {
        self.max_ms == 0
    }

    /// Draws the next delay
    pub fn next_delay(&self) -> Duration {
        if self.min_ms == self.max_ms {
            return Duration::from_millis(self.min_ms);
        }
        let ms = rand::rng().random_range(self.min_ms..=self.max_ms);
        Duration::from_millis(ms)
    }

    /// Sleeps for the next delay
    pub async fn pause(&self) {
        if self.is_disabled() {
            return;
        }
        tokio::time::sleep(self.next_delay()).await;
    }
}
