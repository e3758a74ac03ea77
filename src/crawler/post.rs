//! Post and comment fetching

use crate::config::Config;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::{parse_comments, parse_post};
use crate::crawler::record::{Comment, Post, PostFailure, PostOutcome};
use crate::date::DateNormalizer;
use crate::url::{post_id_from_link, SiteUrls};
use crate::{ConfigError, Result};

/// Everything a worker needs to turn a link into a post
///
/// Built once per crawl and shared read-only between the driver and workers.
#[derive(Debug, Clone)]
pub struct HarvestContext {
    pub fetcher: Fetcher,
    pub urls: SiteUrls,
    pub dates: DateNormalizer,
}

impl HarvestContext {
    /// Builds the context described by a validated configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let dates = DateNormalizer::from_offset_minutes(config.site.utc_offset_minutes)
            .ok_or_else(|| {
                ConfigError::Validation(format!(
                    "utc-offset-minutes out of range: {}",
                    config.site.utc_offset_minutes
                ))
            })?;

        Ok(Self {
            fetcher: Fetcher::new(config)?,
            urls: SiteUrls::from_config(&config.site)?,
            dates,
        })
    }
}

/// Fetches a post page and its comments
///
/// The post identifier is derived from the link before anything is fetched,
/// so links of an unexpected shape fail without network traffic.
pub async fn fetch_post(ctx: &HarvestContext, link: &str) -> Result<Post> {
    let post_id = post_id_from_link(ctx.urls.base(), link)?;

    let url = ctx.urls.post_url(link)?;
    let html = ctx.fetcher.fetch_text(&url).await?;
    let fields = parse_post(&html, &ctx.dates);

    let comments = fetch_comments(ctx, &post_id).await?;

    Ok(Post {
        title: fields.title,
        content: fields.content,
        tags: fields.tags,
        date: fields.date,
        comments,
    })
}

/// Fetches the comments listing of a post
pub async fn fetch_comments(ctx: &HarvestContext, post_id: &str) -> Result<Vec<Comment>> {
    tracing::info!("comment: {}", post_id);

    let url = ctx.urls.comments_url(post_id)?;
    let html = ctx.fetcher.fetch_text(&url).await?;
    Ok(parse_comments(&html, &ctx.dates))
}

/// Runs the post fetcher for one link and folds any error into the outcome
pub async fn harvest_link(ctx: &HarvestContext, link: String) -> PostOutcome {
    match fetch_post(ctx, &link).await {
        Ok(post) => PostOutcome::Fetched(post),
        Err(e) => {
            tracing::error!("Failed to harvest {}: {}", link, e);
            PostOutcome::Failed(PostFailure {
                link,
                error: e.to_string(),
            })
        }
    }
}
