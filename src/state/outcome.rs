//! Outcome of processing a single article ID
//!
//! Every ID in the crawl range ends in exactly one of these. Skips are never
//! errors: a missing page, a blocked request and a template mismatch are all
//! consumed the same way and only differ in the recorded reason.

use crate::article::{ArticleField, ArticleRecord};
use crate::crawler::FetchFailure;
use std::fmt;

/// Result of fetching and extracting one article page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Page resolved into a complete record
    Harvested(ArticleRecord),

    /// Page produced no record
    Skipped(SkipReason),
}

impl PageOutcome {
    /// Returns true if a record was produced
    pub fn is_harvested(&self) -> bool {
        matches!(self, Self::Harvested(_))
    }

    /// Returns the skip reason, if any
    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            Self::Skipped(reason) => Some(reason),
            Self::Harvested(_) => None,
        }
    }

    /// Consumes the outcome, returning the record if one was produced
    pub fn into_record(self) -> Option<ArticleRecord> {
        match self {
            Self::Harvested(record) => Some(record),
            Self::Skipped(_) => None,
        }
    }
}

/// Why an ID produced no record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The request failed (network error, timeout, non-2xx status)
    Fetch(FetchFailure),

    /// A required field matched no element
    MissingField(ArticleField),

    /// A required field matched but its text was empty
    EmptyField(ArticleField),
}

impl SkipReason {
    /// Short stable label, used as a statistics key
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch(FetchFailure::Status(_)) => "http_status",
            Self::Fetch(FetchFailure::Timeout) => "timeout",
            Self::Fetch(FetchFailure::Network(_)) => "network",
            Self::Fetch(FetchFailure::Body(_)) => "body",
            Self::MissingField(_) => "missing_field",
            Self::EmptyField(_) => "empty_field",
        }
    }

    /// Returns true if the page was never retrieved
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(failure) => write!(f, "fetch failed: {}", failure),
            Self::MissingField(field) => write!(f, "required field '{}' not found", field),
            Self::EmptyField(field) => write!(f, "required field '{}' is empty", field),
        }
    }
}
