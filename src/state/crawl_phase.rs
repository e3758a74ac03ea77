//! Crawl phase definitions for the crawl driver
//!
//! A crawl moves strictly forward through its phases.

use std::fmt;

/// Represents the current phase of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Listing pages are being fetched and post links dispatched to workers
    Paginating,

    /// No more links will be dispatched; waiting for workers to finish
    Draining,

    /// Collected posts are being written to chunk files
    Serializing,

    /// The run has finished
    Done,
}

impl CrawlPhase {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if `next` directly follows this phase
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Paginating, Self::Draining)
                | (Self::Draining, Self::Serializing)
                | (Self::Serializing, Self::Done)
        )
    }

    /// Returns the lowercase name of the phase
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paginating => "paginating",
            Self::Draining => "draining",
            Self::Serializing => "serializing",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        assert!(CrawlPhase::Paginating.can_transition_to(CrawlPhase::Draining));
        assert!(CrawlPhase::Draining.can_transition_to(CrawlPhase::Serializing));
        assert!(CrawlPhase::Serializing.can_transition_to(CrawlPhase::Done));
    }

    #[test]
    fn test_no_skipping_or_going_back() {
        assert!(!CrawlPhase::Paginating.can_transition_to(CrawlPhase::Serializing));
        assert!(!CrawlPhase::Draining.can_transition_to(CrawlPhase::Paginating));
        assert!(!CrawlPhase::Done.can_transition_to(CrawlPhase::Paginating));
        assert!(!CrawlPhase::Paginating.can_transition_to(CrawlPhase::Paginating));
    }

    #[test]
    fn test_is_terminal() {
        assert!(CrawlPhase::Done.is_terminal());
        assert!(!CrawlPhase::Paginating.is_terminal());
        assert!(!CrawlPhase::Draining.is_terminal());
        assert!(!CrawlPhase::Serializing.is_terminal());
    }

    #[test]
    fn test_display() {
        assert_eq!(CrawlPhase::Draining.to_string(), "draining");
    }
}
