//! Weibo comments: a polite search-and-comment-tree crawler
//!
//! This crate lists posts from a Weibo search results feed and walks each
//! post's comment tree (top-level comments and their replies), following the
//! service's pagination cursors, filtering replies by recency and stripping
//! markup out of comment text.

pub mod config;
pub mod crawler;
pub mod model;
pub mod output;
pub mod text;

use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },

    #[error("Malformed response from {url}: {message}")]
    Protocol { url: String, message: String },

    #[error("Timestamp error: {0}")]
    Timestamp(#[from] TimestampError),

    #[error("Render data error: {0}")]
    RenderData(#[from] RenderDataError),

    #[error("Post detail for {mid} unavailable after retry: {message}")]
    DetailUnavailable { mid: String, message: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
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

/// A timestamp that does not match the service's fixed-width format
#[derive(Debug, Error)]
#[error("unrecognized timestamp '{input}': {source}")]
pub struct TimestampError {
    pub input: String,
    #[source]
    pub source: chrono::ParseError,
}

/// Failures reading the JSON blob embedded in a post detail page
#[derive(Debug, Error)]
pub enum RenderDataError {
    #[error("no script carries the $render_data marker")]
    MissingMarker,

    #[error("$render_data blob is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("$render_data is missing field {0}")]
    MissingField(&'static str),
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use model::{CommentDepth, CommentRecord, Cursor, SearchHit};
pub use text::{clean_html, format_weibo_timestamp, RecencyCutoff};
