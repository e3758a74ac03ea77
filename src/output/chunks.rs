//! Chunked JSON output
//!
//! Posts are split into fixed-size chunks and each chunk is written as a
//! pretty-printed JSON array to `<directory>/<prefix><index>.json`.

use crate::config::{ChunkMode, OutputConfig};
use crate::crawler::Post;
use crate::output::OutputResult;
use std::fs;
use std::ops::Range;
use std::path::PathBuf;

/// Outcome of writing every chunk of a crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkReport {
    /// Files written successfully, in chunk order
    pub written: Vec<PathBuf>,
    /// Chunks whose write failed
    pub failed: usize,
    /// Posts left out by truncating chunk mode
    pub dropped: usize,
}

/// Computes the index ranges of each chunk
///
/// # Examples
///
/// ```
/// use blog_harvest::config::ChunkMode;
/// use blog_harvest::output::plan_chunks;
///
/// assert_eq!(plan_chunks(12, 5, ChunkMode::Complete), vec![0..5, 5..10, 10..12]);
/// assert_eq!(plan_chunks(12, 5, ChunkMode::Truncate), vec![0..5, 5..10]);
/// ```
pub fn plan_chunks(total: usize, chunk_size: usize, mode: ChunkMode) -> Vec<Range<usize>> {
    if chunk_size == 0 {
        return Vec::new();
    }

    let count = match mode {
        ChunkMode::Complete => total.div_ceil(chunk_size),
        ChunkMode::Truncate => total / chunk_size,
    };

    (0..count)
        .map(|i| {
            let start = i * chunk_size;
            start..(start + chunk_size).min(total)
        })
        .collect()
}

/// Writes chunk files into one directory
#[derive(Debug, Clone)]
pub struct ChunkWriter {
    directory: PathBuf,
    prefix: String,
}

impl ChunkWriter {
    pub fn new(directory: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            prefix: prefix.into(),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.directory, &config.file_prefix)
    }

    /// Path of chunk `index`
    pub fn chunk_path(&self, index: usize) -> PathBuf {
        self.directory.join(format!("{}{}.json", self.prefix, index))
    }

    /// Serializes one chunk and writes it to disk
    pub fn write_chunk(&self, index: usize, posts: &[Post]) -> OutputResult<PathBuf> {
        let path = self.chunk_path(index);
        let json = serde_json::to_vec_pretty(posts)?;
        fs::write(&path, json)?;
        Ok(path)
    }

    /// Writes every chunk of `posts`
    ///
    /// A failed chunk is logged and counted; the remaining chunks are still
    /// attempted.
    pub fn write_all(&self, posts: &[Post], chunk_size: usize, mode: ChunkMode) -> ChunkReport {
        let ranges = plan_chunks(posts.len(), chunk_size, mode);
        let covered = ranges.last().map(|r| r.end).unwrap_or(0);
        let mut report = ChunkReport {
            dropped: posts.len() - covered,
            ..ChunkReport::default()
        };

        if report.dropped > 0 {
            tracing::warn!(
                "Truncating chunk mode drops the last {} of {} posts",
                report.dropped,
                posts.len()
            );
        }

        if let Err(e) = fs::create_dir_all(&self.directory) {
            tracing::error!(
                "Cannot create output directory {}: {}",
                self.directory.display(),
                e
            );
        }

        for (index, range) in ranges.into_iter().enumerate() {
            match self.write_chunk(index, &posts[range.clone()]) {
                Ok(path) => {
                    tracing::info!(
                        "Wrote {} posts to {}",
                        range.len(),
                        path.display()
                    );
                    report.written.push(path);
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to write {}: {}",
                        self.chunk_path(index).display(),
                        e
                    );
                    report.failed += 1;
                }
            }
        }

        report
    }
}
