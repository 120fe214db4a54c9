//! Cursor-paginated comment lists
//!
//! Both levels of a comment tree come from the same endpoint: the top-level
//! comments of a post, and the replies under one of those comments. A
//! [`CommentPager`] walks one such list. It owns its own cursor, so the
//! parent list and every reply list advance independently.

use crate::crawler::fetcher::{decode_json, json_scalar};
use crate::crawler::limiter::{Pause, RateLimiter};
use crate::model::Cursor;
use crate::{CrawlError, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

/// Entries requested per page
const PAGE_SIZE: &str = "20";

/// Which list of a comment tree a pager walks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentLevel {
    /// Top-level comments of a post
    Parent,
    /// Replies to one top-level comment
    Reply,
}

impl CommentLevel {
    /// Level-specific flags sent with every request
    fn flags(&self) -> [(&'static str, &'static str); 3] {
        match self {
            CommentLevel::Parent => [
                ("is_show_bulletin", "3"),
                ("is_mix", "0"),
                ("fetch_level", "0"),
            ],
            CommentLevel::Reply => [
                ("is_show_bulletin", "2"),
                ("is_mix", "1"),
                ("fetch_level", "1"),
            ],
        }
    }
}

/// One comment as the endpoint returns it
#[derive(Debug, Clone, Deserialize)]
pub struct CommentEntry {
    /// Comment id; replies to this comment are listed under it
    #[serde(default)]
    pub id: Value,

    #[serde(default)]
    pub text: Option<String>,

    /// Quoted material the comment refers to
    #[serde(default)]
    pub reply_original_text: Option<String>,

    pub created_at: String,
}

impl CommentEntry {
    /// The markup to clean for this comment
    ///
    /// Quoted original text wins over the comment's own text.
    pub fn body(&self) -> &str {
        self.reply_original_text
            .as_deref()
            .or(self.text.as_deref())
            .unwrap_or("")
    }

    /// The comment id as a string, if the entry carries one
    pub fn id_string(&self) -> Option<String> {
        json_scalar(&self.id)
    }
}

/// Body of a comment-list response
#[derive(Debug, Deserialize)]
struct CommentListResponse {
    #[serde(default)]
    max_id: Value,

    #[serde(default)]
    data: Vec<CommentEntry>,
}

/// One fetched page of a comment list
#[derive(Debug, Clone)]
pub struct CommentPage {
    /// Full URL of the request that produced the page
    pub source_url: String,

    pub entries: Vec<CommentEntry>,
}

/// Walks one comment list page by page
///
/// The pager starts with no cursor, replaces it with the `max_id` of every
/// response, and stops once the service answers with the zero sentinel.
#[derive(Debug, Clone)]
pub struct CommentPager {
    level: CommentLevel,
    target_id: String,
    owner_id: String,
    cursor: Cursor,
    requests: u32,
}

impl CommentPager {
    /// Pager over the top-level comments of a post
    pub fn parents(post_id: &str, author_id: &str) -> Self {
        Self::new(CommentLevel::Parent, post_id, author_id)
    }

    /// Pager over the replies to one comment
    pub fn replies(comment_id: &str, author_id: &str) -> Self {
        Self::new(CommentLevel::Reply, comment_id, author_id)
    }

    fn new(level: CommentLevel, target_id: &str, owner_id: &str) -> Self {
        Self {
            level,
            target_id: target_id.to_string(),
            owner_id: owner_id.to_string(),
            cursor: Cursor::Start,
            requests: 0,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor.is_exhausted()
    }

    /// Number of requests this pager has sent
    pub fn requests_made(&self) -> u32 {
        self.requests
    }

    /// Builds the URL of the next request
    ///
    /// The first request of a reply list asks for `max_id=0`; the first
    /// request of a parent list sends no cursor at all. Every later request
    /// sends `flow=0` and the cursor from the previous page.
    pub fn request_url(&self, base: &str) -> Result<Url> {
        let mut params: Vec<(&str, &str)> = vec![
            ("is_reload", "1"),
            ("id", self.target_id.as_str()),
            ("count", PAGE_SIZE),
            ("uid", self.owner_id.as_str()),
            ("locale", "zh-CN"),
        ];
        params.extend(self.level.flags());

        match self.cursor.token() {
            Some(token) => {
                params.push(("flow", "0"));
                params.push(("max_id", token));
            }
            None => {
                if self.level == CommentLevel::Reply {
                    params.push(("max_id", "0"));
                }
            }
        }

        Ok(Url::parse_with_params(base, &params)?)
    }

    /// Fetches the next page and advances the cursor
    ///
    /// Returns `Ok(None)` without sending anything once the list is
    /// exhausted. Every request is followed by a [`Pause::AfterRequest`],
    /// whatever its outcome.
    pub async fn fetch_next_page(
        &mut self,
        client: &Client,
        base: &str,
        limiter: &dyn RateLimiter,
    ) -> Result<Option<CommentPage>> {
        if self.is_exhausted() {
            return Ok(None);
        }

        let url = self.request_url(base)?;
        tracing::debug!(
            "Requesting {:?} comments of {} (cursor {:?})",
            self.level,
            self.target_id,
            self.cursor
        );

        let response = client.get(url.clone()).send().await;
        self.requests += 1;
        limiter.pause(Pause::AfterRequest).await;

        let (source_url, page): (String, CommentListResponse) = decode_json(response, &url).await?;

        self.cursor = Cursor::from_max_id(&page.max_id).ok_or_else(|| CrawlError::Protocol {
            url: source_url.clone(),
            message: format!("unusable max_id {}", page.max_id),
        })?;

        tracing::trace!(
            "{} entries from {}, next cursor {:?}",
            page.data.len(),
            source_url,
            self.cursor
        );

        Ok(Some(CommentPage {
            source_url,
            entries: page.data,
        }))
    }
}
