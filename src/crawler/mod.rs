//! Crawler module for listing pagination and post harvesting
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - HTML extraction of post links, posts and comments
//! - The worker pool that fetches posts concurrently
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod pool;
mod post;
mod record;

pub use coordinator::{Coordinator, PaginationReport};
pub use fetcher::{build_http_client, Fetcher, RetryPolicy};
pub use parser::{extract_post_links, parse_comments, parse_post, PostFields};
pub use pool::{LinkSender, WorkerPool};
pub use post::{fetch_comments, fetch_post, harvest_link, HarvestContext};
pub use record::{partition_outcomes, Comment, Post, PostFailure, PostOutcome};
