//! Blog-Harvest: a blogfa.com post and comment harvester
//!
//! This crate pages through a blog's post listing, fetches every post and its
//! comments with a fixed pool of workers, and writes the collected posts to
//! chunked JSON files.

pub mod config;
pub mod crawler;
pub mod date;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Blog-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Giving up on {url} after {attempts} attempts: {last_error}")]
    FetchExhausted {
        url: String,
        attempts: u32,
        last_error: String,
    },

    #[error("Link error: {0}")]
    Link(#[from] LinkError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid phase transition: {from} -> {to}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },

    #[error("Work accounting mismatch: dispatched {dispatched} links, received {received} outcomes")]
    WorkAccounting { dispatched: usize, received: usize },

    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Link queue closed before {0} could be dispatched")]
    QueueClosed(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while turning a post link into a post identifier
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkError {
    #[error("Failed to resolve link {link}: {message}")]
    Resolve { link: String, message: String },

    #[error("Link {0} does not have the shape /post/<id>")]
    UnexpectedShape(String),
}

/// Result type alias for Blog-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Comment, Post};
pub use date::DateNormalizer;
pub use state::CrawlPhase;
