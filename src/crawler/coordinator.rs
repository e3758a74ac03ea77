//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl driver that moves one run through its
//! phases:
//! - Paginating: walks the listing pages and feeds post links to the pool
//! - Draining: closes the link queue and waits for every worker outcome
//! - Serializing: writes the collected posts as chunk files
//! - Done: builds the final summary

use crate::config::{validate, Config};
use crate::crawler::parser::extract_post_links;
use crate::crawler::pool::{LinkSender, WorkerPool};
use crate::crawler::post::{harvest_link, HarvestContext};
use crate::crawler::record::{partition_outcomes, PostOutcome};
use crate::output::{generate_markdown_summary, write_chunks, CrawlSummary};
use crate::state::CrawlPhase;
use crate::{HarvestError, Result};
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task;

/// Counts gathered while walking the listing pages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationReport {
    pub pages_fetched: u32,
    pub listing_failures: u32,
    pub links_dispatched: usize,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    ctx: Arc<HarvestContext>,
    phase: CrawlPhase,
    config_hash: Option<String>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration; validated here
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run, in the `Paginating` phase
    /// * `Err(HarvestError)` - Invalid configuration or HTTP client setup failure
    pub fn new(config: Config) -> Result<Self> {
        validate(&config)?;
        let ctx = HarvestContext::from_config(&config)?;

        Ok(Self {
            config: Arc::new(config),
            ctx: Arc::new(ctx),
            phase: CrawlPhase::Paginating,
            config_hash: None,
        })
    }

    /// Attaches the configuration hash reported in the summary
    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = Some(hash.into());
        self
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Moves the driver to `next`
    ///
    /// # Returns
    ///
    /// * `Err(HarvestError::InvalidTransition)` - `next` does not follow the
    ///   current phase
    pub fn transition(&mut self, next: CrawlPhase) -> Result<()> {
        if !self.phase.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }

        tracing::info!("Phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }

    /// Runs the crawl to completion
    ///
    /// Every dispatched link yields exactly one outcome; the run fails with
    /// `HarvestError::WorkAccounting` otherwise. Failed posts and failed
    /// chunk writes are reported in the summary, not returned as errors.
    pub async fn run(&mut self) -> Result<CrawlSummary> {
        let started_at = Utc::now();
        tracing::info!(
            "Starting crawl of {} with {} workers",
            self.ctx.urls.base(),
            self.config.crawler.worker_count
        );

        let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel::<PostOutcome>();
        let collector = tokio::spawn(async move {
            let mut outcomes = Vec::new();
            while let Some(outcome) = outcome_rx.recv().await {
                outcomes.push(outcome);
            }
            outcomes
        });

        let ctx = Arc::clone(&self.ctx);
        let (link_tx, pool) = WorkerPool::spawn(
            self.config.crawler.worker_count,
            move |link: String| {
                let ctx = Arc::clone(&ctx);
                async move { harvest_link(&ctx, link).await }
            },
            outcome_tx,
        );

        let pagination = self.paginate(&link_tx).await?;
        drop(link_tx);
        tracing::info!(
            "Pagination finished: {} pages, {} links",
            pagination.pages_fetched,
            pagination.links_dispatched
        );

        self.transition(CrawlPhase::Draining)?;
        let processed = pool.join().await?;
        let outcomes = collector.await?;
        tracing::debug!("Workers processed {} links", processed);

        if outcomes.len() != pagination.links_dispatched {
            return Err(HarvestError::WorkAccounting {
                dispatched: pagination.links_dispatched,
                received: outcomes.len(),
            });
        }

        let (posts, failures) = partition_outcomes(outcomes);
        tracing::info!(
            "Collected {} posts ({} failed)",
            posts.len(),
            failures.len()
        );

        let posts_collected = posts.len();
        let comments_collected = posts.iter().map(|p| p.comments.len()).sum();

        self.transition(CrawlPhase::Serializing)?;
        let output = self.config.output.clone();
        let report = task::spawn_blocking(move || write_chunks(&posts, &output)).await?;

        self.transition(CrawlPhase::Done)?;
        let summary = CrawlSummary {
            started_at: Some(started_at),
            finished_at: Some(Utc::now()),
            config_hash: self.config_hash.clone(),
            pages_fetched: pagination.pages_fetched,
            listing_failures: pagination.listing_failures,
            links_dispatched: pagination.links_dispatched,
            posts_collected,
            comments_collected,
            post_failures: failures.into_iter().map(|f| (f.link, f.error)).collect(),
            chunk_mode: self.config.output.chunk_mode,
            chunk_files: report.written,
            chunk_failures: report.failed,
            posts_dropped: report.dropped,
        };

        if let Some(path) = self.config.output.summary_path.clone() {
            let report = summary.clone();
            let target = path.clone();
            let written =
                task::spawn_blocking(move || generate_markdown_summary(&report, Path::new(&target)))
                    .await?;
            match written {
                Ok(()) => tracing::info!("Wrote crawl summary to {}", path),
                Err(e) => tracing::error!("Failed to write crawl summary to {}: {}", path, e),
            }
        }

        Ok(summary)
    }

    /// Walks the listing pages, pushing every post link onto the queue
    ///
    /// Stops once the page number passes the configured limit, when a page
    /// lists no posts (if enabled), or when a listing page cannot be fetched.
    async fn paginate(&self, links: &LinkSender) -> Result<PaginationReport> {
        let crawler = &self.config.crawler;
        let limit = crawler.page_limit();
        let mut report = PaginationReport::default();
        let mut page = crawler.start_page;

        loop {
            let url = self.ctx.urls.listing_url(page)?;
            tracing::info!("page: {}", page);

            let html = match self.ctx.fetcher.fetch_text(&url).await {
                Ok(html) => html,
                Err(e) => {
                    tracing::error!("Listing page {} unavailable, ending pagination: {}", page, e);
                    report.listing_failures += 1;
                    break;
                }
            };
            report.pages_fetched += 1;

            let found = extract_post_links(&html);
            if found.is_empty() && crawler.stop_on_empty_page {
                tracing::info!("Listing page {} has no posts, ending pagination", page);
                break;
            }

            for link in found {
                tracing::info!("link: {}", link);
                links
                    .send(link)
                    .await
                    .map_err(|e| HarvestError::QueueClosed(e.0))?;
                report.links_dispatched += 1;
            }

            page = page.saturating_add(1);
            if limit.is_some_and(|limit| page > limit) {
                tracing::info!("Reached page limit {}", page - 1);
                break;
            }
        }

        Ok(report)
    }
}
