//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: the phase of a crawl run (paginating, draining, serializing, done)

mod crawl_phase;

pub use crawl_phase::CrawlPhase;
