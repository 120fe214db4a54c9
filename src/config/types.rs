use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for a crawl
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub search: SearchConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    pub client: ClientConfig,
    #[serde(default)]
    pub endpoints: EndpointConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// What to search for
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Search query text
    pub query: String,

    /// Number of search result pages to scan, starting at page 1
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,
}

/// Walk behavior and pacing
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Replies not newer than this many calendar months ago are dropped
    #[serde(rename = "months-ago", default = "default_months_ago")]
    pub months_ago: u32,

    /// Pause after every comment request (milliseconds)
    #[serde(rename = "request-delay-ms", default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Pause between two pages of top-level comments (milliseconds)
    #[serde(rename = "page-delay-ms", default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    /// Pause before the single retry of a post detail lookup (milliseconds)
    #[serde(rename = "retry-delay-ms", default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Look up each post's detail page before walking its comments
    #[serde(rename = "fetch-post-details", default)]
    pub fetch_post_details: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            months_ago: default_months_ago(),
            request_delay_ms: default_request_delay_ms(),
            page_delay_ms: default_page_delay_ms(),
            retry_delay_ms: default_retry_delay_ms(),
            fetch_post_details: false,
        }
    }
}

/// Immutable HTTP client settings shared by every component
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Raw `Cookie` header value of a logged-in session
    #[serde(default)]
    pub cookie: String,

    #[serde(default = "default_referer")]
    pub referer: String,

    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Remote endpoints; overridable so tests can point at a mock server
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    #[serde(rename = "search-url", default = "default_search_url")]
    pub search_url: String,

    #[serde(rename = "comments-url", default = "default_comments_url")]
    pub comments_url: String,

    /// Base of the single-post page; the post id is appended as a path segment
    #[serde(rename = "detail-url", default = "default_detail_url")]
    pub detail_url: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            comments_url: default_comments_url(),
            detail_url: default_detail_url(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// How emitted records are rendered on stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Jsonl,
}

fn default_max_pages() -> u32 {
    1
}

fn default_months_ago() -> u32 {
    1
}

fn default_request_delay_ms() -> u64 {
    3_000
}

fn default_page_delay_ms() -> u64 {
    10_000
}

fn default_retry_delay_ms() -> u64 {
    10_000
}

fn default_referer() -> String {
    "https://s.weibo.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_search_url() -> String {
    "https://s.weibo.com/weibo".to_string()
}

fn default_comments_url() -> String {
    "https://weibo.com/ajax/statuses/buildComments".to_string()
}

fn default_detail_url() -> String {
    "https://m.weibo.cn/detail".to_string()
}
