//! Text handling module
//!
//! This module provides markup cleaning for comment bodies and the date
//! handling the crawl relies on: the service's timestamp format and the
//! recency cutoff applied to replies.

mod clean;
mod date;

// Re-export main functions
pub use clean::{clean_html, strip_zero_width};
pub use date::{
    format_weibo_timestamp, parse_weibo_timestamp, RecencyCutoff, CANONICAL_FORMAT,
    WEIBO_TIMESTAMP_FORMAT,
};
