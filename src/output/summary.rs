//! Crawl summary counts

use crate::config::ChunkMode;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Summary statistics for a finished crawl
#[derive(Debug, Clone, Default)]
pub struct CrawlSummary {
    // Run metadata
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub config_hash: Option<String>,

    // Pagination
    pub pages_fetched: u32,
    pub listing_failures: u32,
    pub links_dispatched: usize,

    // Posts
    pub posts_collected: usize,
    pub comments_collected: usize,
    pub post_failures: Vec<(String, String)>,

    // Serialization
    pub chunk_mode: ChunkMode,
    pub chunk_files: Vec<PathBuf>,
    pub chunk_failures: usize,
    pub posts_dropped: usize,
}

impl CrawlSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wall-clock duration in seconds, if both timestamps are set
    pub fn duration_seconds(&self) -> Option<i64> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => Some((end - start).num_seconds()),
            _ => None,
        }
    }

    /// Percentage of dispatched links that became posts
    pub fn success_rate(&self) -> f64 {
        if self.links_dispatched == 0 {
            return 0.0;
        }
        (self.posts_collected as f64 / self.links_dispatched as f64) * 100.0
    }

    /// Returns true if every link, listing page and chunk succeeded
    pub fn is_clean(&self) -> bool {
        self.post_failures.is_empty() && self.listing_failures == 0 && self.chunk_failures == 0
    }
}

/// Prints the summary to stdout
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");

    if let Some(hash) = &summary.config_hash {
        println!("Config hash: {}", hash);
    }
    if let Some(duration) = summary.duration_seconds() {
        println!("Duration: {}s", duration);
    }
    println!();

    println!("Pagination:");
    println!("  Listing pages fetched: {}", summary.pages_fetched);
    println!("  Listing pages failed: {}", summary.listing_failures);
    println!("  Post links dispatched: {}", summary.links_dispatched);
    println!();

    println!("Posts:");
    println!("  Collected: {}", summary.posts_collected);
    println!("  Comments: {}", summary.comments_collected);
    println!("  Failed: {}", summary.post_failures.len());
    for (link, error) in summary.post_failures.iter().take(20) {
        println!("    - {}: {}", link, error);
    }
    println!();

    println!("Output ({} mode):", summary.chunk_mode.as_str());
    for path in &summary.chunk_files {
        println!("  - {}", path.display());
    }
    if summary.chunk_failures > 0 {
        println!("  Failed chunks: {}", summary.chunk_failures);
    }
    if summary.posts_dropped > 0 {
        println!("  Posts dropped: {}", summary.posts_dropped);
    }
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} links harvested)",
        summary.success_rate(),
        summary.posts_collected,
        summary.links_dispatched
    );
}
