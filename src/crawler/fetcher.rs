//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeouts
//! - GET requests for listing, post and comment pages
//! - Bounded retry with exponential backoff

use crate::config::{Config, CrawlerConfig};
use crate::{HarvestError, Result};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Connect timeout for every request
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Retry policy for document fetches
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Delay after the first failed attempt
    pub initial_backoff: Duration,
    /// Upper bound on any single delay
    pub max_backoff: Duration,
    /// Growth factor between consecutive delays
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(10),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Builds the policy described by the crawler configuration
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            max_attempts: config.max_fetch_attempts,
            initial_backoff: Duration::from_millis(config.retry_initial_delay_ms),
            max_backoff: Duration::from_millis(config.retry_max_delay_ms),
            ..Self::default()
        }
    }

    /// Delay to wait after failed attempt number `attempt` (1-based)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(30) as i32;
        let secs = self.initial_backoff.as_secs_f64() * self.multiplier.powi(exponent);
        let capped = secs.min(self.max_backoff.as_secs_f64());
        Duration::from_secs_f64(capped.max(0.0))
    }

    /// Returns true if another attempt is allowed after `attempt` failures
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use blog_harvest::config::parse_config;
/// use blog_harvest::crawler::build_http_client;
///
/// let config = parse_config("[site]\nbase-url = \"http://myblog.blogfa.com/\"").unwrap();
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(Duration::from_secs(config.crawler.request_timeout_secs))
        .connect_timeout(CONNECT_TIMEOUT)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Shared document fetcher used by the driver and every worker
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    retry: RetryPolicy,
}

impl Fetcher {
    /// Creates a fetcher from the crawl configuration
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::with_client(
            build_http_client(config)?,
            RetryPolicy::from_config(&config.crawler),
        ))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// Fetches a document body, retrying failed attempts with backoff
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The response body of the first successful attempt
    /// * `Err(HarvestError::FetchExhausted)` - Every allowed attempt failed
    pub async fn fetch_text(&self, url: &Url) -> Result<String> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let failure = match self.attempt(url).await {
                Ok(body) => return Ok(body),
                Err(failure) => failure,
            };

            if !self.retry.should_retry(attempt) {
                tracing::error!("Giving up on {} after {} attempts: {}", url, attempt, failure);
                return Err(HarvestError::FetchExhausted {
                    url: url.to_string(),
                    attempts: attempt,
                    last_error: failure,
                });
            }

            let delay = self.retry.backoff_for(attempt);
            tracing::warn!(
                "Fetch of {} failed (attempt {}/{}): {}; retrying in {:?}",
                url,
                attempt,
                self.retry.max_attempts,
                failure,
                delay
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// Performs a single GET; the error is the failure message
    async fn attempt(&self, url: &Url) -> std::result::Result<String, String> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status.as_u16()));
        }

        response.text().await.map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> Config {
        parse_config(
            r#"
[site]
base-url = "http://myblog.blogfa.com/"

[user-agent]
crawler-name = "TestHarvester"
crawler-version = "1.0"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(&test_config()).is_ok());
    }

    #[test]
    fn test_retry_policy_from_config() {
        let config = test_config();
        let policy = RetryPolicy::from_config(&config.crawler);
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.initial_backoff, Duration::from_millis(500));
        assert_eq!(policy.max_backoff, Duration::from_secs(10));
    }

    #[test]
    fn test_backoff_is_exponential_and_capped() {
        let policy = RetryPolicy {
            max_attempts: 10,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(5),
            multiplier: 2.0,
        };

        assert_eq!(policy.backoff_for(1), Duration::from_secs(1));
        assert_eq!(policy.backoff_for(2), Duration::from_secs(2));
        assert_eq!(policy.backoff_for(3), Duration::from_secs(4));
        assert_eq!(policy.backoff_for(4), Duration::from_secs(5));
        assert_eq!(policy.backoff_for(40), Duration::from_secs(5));
    }

    #[test]
    fn test_should_retry() {
        let policy = RetryPolicy {
            max_attempts: 3,
            ..RetryPolicy::default()
        };
        assert!(policy.should_retry(1));
        assert!(policy.should_retry(2));
        assert!(!policy.should_retry(3));
    }

    fn fast_fetcher(max_attempts: u32) -> Fetcher {
        let policy = RetryPolicy {
            max_attempts,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(2),
            ..RetryPolicy::default()
        };
        Fetcher::with_client(build_http_client(&test_config()).unwrap(), policy)
    }

    #[tokio::test]
    async fn test_fetch_text_recovers_after_failed_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/page", server.uri())).unwrap();
        assert_eq!(fast_fetcher(3).fetch_text(&url).await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_fetch_text_reports_last_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(2)
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/missing", server.uri())).unwrap();
        let err = fast_fetcher(2).fetch_text(&url).await.unwrap_err();

        match err {
            HarvestError::FetchExhausted {
                attempts,
                last_error,
                ..
            } => {
                assert_eq!(attempts, 2);
                assert_eq!(last_error, "HTTP 404");
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
