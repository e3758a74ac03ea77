//! Output module for chunked post files and crawl summaries
//!
//! This module handles:
//! - Planning and writing the chunked JSON post files
//! - Collecting crawl counts into a summary
//! - Rendering the summary as markdown

mod chunks;
mod markdown;
mod summary;

pub use chunks::{plan_chunks, ChunkReport, ChunkWriter};
pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use summary::{print_summary, CrawlSummary};

use crate::config::OutputConfig;
use crate::crawler::Post;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize posts: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Writes `posts` as chunk files described by the output configuration
///
/// # Arguments
///
/// * `posts` - Every post collected by the crawl
/// * `config` - Output directory, file prefix, chunk size and mode
///
/// # Returns
///
/// A report of written files, failed chunks and dropped posts. Individual
/// write failures never abort the remaining chunks.
pub fn write_chunks(posts: &[Post], config: &OutputConfig) -> ChunkReport {
    ChunkWriter::from_config(config).write_all(posts, config.chunk_size, config.chunk_mode)
}
