use serde::Deserialize;

/// Main configuration structure for Blog-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the blog lives and how its pages are addressed
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Root URL of the blog, e.g. `http://shabeasheghan.blogfa.com/`
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Listing query appended to the base URL; `{page}` is the page number
    #[serde(rename = "page-query", default = "default_page_query")]
    pub page_query: String,

    /// Comments listing path; `{blog}` is the blog id, `{post}` the post id
    #[serde(rename = "comments-path", default = "default_comments_path")]
    pub comments_path: String,

    /// Blog identifier used by the comments endpoint.
    /// Defaults to the first label of the base URL host.
    #[serde(rename = "blog-id", default)]
    pub blog_id: Option<String>,

    /// Offset of the blog's local time from UTC, in minutes
    #[serde(rename = "utc-offset-minutes", default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// First listing page to fetch
    #[serde(rename = "start-page", default = "default_start_page")]
    pub start_page: u32,

    /// Last listing page to fetch; zero or negative means no limit
    #[serde(rename = "page-limit", default)]
    pub page_limit: i64,

    /// Number of concurrent post workers
    #[serde(rename = "worker-count", default = "default_worker_count")]
    pub worker_count: usize,

    /// Stop paginating at the first listing page without post links
    #[serde(rename = "stop-on-empty-page", default = "default_true")]
    pub stop_on_empty_page: bool,

    /// Attempts per document before a fetch is given up
    #[serde(rename = "max-fetch-attempts", default = "default_max_fetch_attempts")]
    pub max_fetch_attempts: u32,

    /// Delay before the first retry (milliseconds)
    #[serde(rename = "retry-initial-delay-ms", default = "default_retry_initial_delay_ms")]
    pub retry_initial_delay_ms: u64,

    /// Upper bound on the delay between retries (milliseconds)
    #[serde(rename = "retry-max-delay-ms", default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl CrawlerConfig {
    /// Returns the configured page limit, or `None` when pagination is unbounded
    pub fn page_limit(&self) -> Option<u32> {
        if self.page_limit > 0 {
            Some(u32::try_from(self.page_limit).unwrap_or(u32::MAX))
        } else {
            None
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            start_page: default_start_page(),
            page_limit: 0,
            worker_count: default_worker_count(),
            stop_on_empty_page: true,
            max_fetch_attempts: default_max_fetch_attempts(),
            retry_initial_delay_ms: default_retry_initial_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email", default)]
    pub contact_email: Option<String>,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// `Name/Version`, followed by `(+url; email)` when contact details are set.
    pub fn header_value(&self) -> String {
        let contact: Vec<String> = [
            self.contact_url.as_ref().map(|u| format!("+{}", u)),
            self.contact_email.clone(),
        ]
        .into_iter()
        .flatten()
        .collect();

        if contact.is_empty() {
            format!("{}/{}", self.crawler_name, self.crawler_version)
        } else {
            format!(
                "{}/{} ({})",
                self.crawler_name,
                self.crawler_version,
                contact.join("; ")
            )
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
            contact_email: None,
        }
    }
}

/// How the final post collection is split into files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChunkMode {
    /// Every post is written; the last chunk may be shorter
    #[default]
    Complete,
    /// Only full chunks are written; trailing posts are dropped
    Truncate,
}

impl ChunkMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Truncate => "truncate",
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the chunk files
    #[serde(default = "default_output_directory")]
    pub directory: String,

    /// File name prefix; chunk `i` is written to `<prefix><i>.json`
    #[serde(rename = "file-prefix", default = "default_file_prefix")]
    pub file_prefix: String,

    /// Posts per chunk file
    #[serde(rename = "chunk-size", default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Whether a trailing partial chunk is written
    #[serde(rename = "chunk-mode", default)]
    pub chunk_mode: ChunkMode,

    /// Path to the markdown summary file, if one should be written
    #[serde(rename = "summary-path", default)]
    pub summary_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            file_prefix: default_file_prefix(),
            chunk_size: default_chunk_size(),
            chunk_mode: ChunkMode::default(),
            summary_path: None,
        }
    }
}

fn default_page_query() -> String {
    "?p={page}".to_string()
}

fn default_comments_path() -> String {
    "comments/?blogid={blog}&postid={post}".to_string()
}

fn default_utc_offset_minutes() -> i32 {
    // Asia/Tehran
    210
}

fn default_start_page() -> u32 {
    1
}

fn default_worker_count() -> usize {
    8
}

fn default_true() -> bool {
    true
}

fn default_max_fetch_attempts() -> u32 {
    5
}

fn default_retry_initial_delay_ms() -> u64 {
    500
}

fn default_retry_max_delay_ms() -> u64 {
    10_000
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_crawler_name() -> String {
    "blog-harvest".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_output_directory() -> String {
    ".".to_string()
}

fn default_file_prefix() -> String {
    "posts_".to_string()
}

fn default_chunk_size() -> usize {
    5
}
