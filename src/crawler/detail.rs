//! Single-post detail lookup
//!
//! The mobile post page embeds its data as a script assignment,
//! `var $render_data = [...][0]`. Reading that blob is confined to
//! [`parse_render_data`]; if the page layout drifts, that function is the
//! only thing to change.

use crate::crawler::fetcher::{fetch_url, json_scalar, FetchResult};
use crate::crawler::limiter::{Pause, RateLimiter};
use crate::{CrawlError, RenderDataError, Result};
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use serde_json::Value;
use std::sync::{Arc, OnceLock};
use url::Url;

const RENDER_DATA_MARKER: &str = "$render_data";

/// Metadata of one post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDetail {
    pub user_id: String,
    pub screen_name: String,
    /// Creation time exactly as the page carries it
    pub created_at: String,
    pub comments_count: String,
}

fn render_data_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)var \$render_data = (\[.*?\])\[0\]")
            .expect("render_data pattern is valid")
    })
}

/// Reads post metadata out of a detail page
pub fn parse_render_data(html: &str) -> std::result::Result<PostDetail, RenderDataError> {
    let document = Html::parse_document(html);
    let scripts = Selector::parse("script").map_err(|_| RenderDataError::MissingMarker)?;

    let blob = document
        .select(&scripts)
        .map(|script| script.text().collect::<String>())
        .filter(|text| text.contains(RENDER_DATA_MARKER))
        .find_map(|text| {
            render_data_pattern()
                .captures(&text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        })
        .ok_or(RenderDataError::MissingMarker)?;

    let data: Value = serde_json::from_str(&blob)?;
    let field = |pointer: &str, name: &'static str| {
        data.pointer(pointer)
            .and_then(json_scalar)
            .ok_or(RenderDataError::MissingField(name))
    };

    Ok(PostDetail {
        user_id: field("/0/status/user/id", "status.user.id")?,
        screen_name: field("/0/status/user/screen_name", "status.user.screen_name")?,
        created_at: field("/0/status/created_at", "status.created_at")?,
        comments_count: field("/0/status/comments_count", "status.comments_count")?,
    })
}

/// Looks up post details, retrying a failed request once
pub struct PostDetailFetcher {
    client: Client,
    detail_url: String,
    limiter: Arc<dyn RateLimiter>,
}

impl PostDetailFetcher {
    pub fn new(
        client: Client,
        detail_url: impl Into<String>,
        limiter: Arc<dyn RateLimiter>,
    ) -> Self {
        Self {
            client,
            detail_url: detail_url.into(),
            limiter,
        }
    }

    /// URL of a post's detail page
    pub fn detail_url(&self, mid: &str) -> Result<Url> {
        Ok(Url::parse(&format!(
            "{}/{}",
            self.detail_url.trim_end_matches('/'),
            mid
        ))?)
    }

    /// Fetches and reads one post's detail page
    ///
    /// # Retry Logic
    ///
    /// | Attempt | On failure |
    /// |---------|------------|
    /// | First | Pause ([`Pause::BeforeRetry`]) and retry |
    /// | Retry | [`CrawlError::DetailUnavailable`] |
    ///
    /// A page that loads but carries no readable blob is a
    /// [`CrawlError::RenderData`] error and is not retried.
    pub async fn fetch(&self, mid: &str) -> Result<PostDetail> {
        let url = self.detail_url(mid)?;

        let body = match fetch_url(&self.client, &url).await {
            FetchResult::Success { body, .. } => body,
            failed => {
                tracing::error!(
                    "Access to {} failed ({}), waiting before retry",
                    url,
                    failed.describe_failure().unwrap_or_default()
                );
                self.limiter.pause(Pause::BeforeRetry).await;
                tracing::warn!("Retrying {}", url);

                match fetch_url(&self.client, &url).await {
                    FetchResult::Success { body, .. } => body,
                    failed => {
                        let message = failed.describe_failure().unwrap_or_default();
                        tracing::error!("Detail lookup for {} failed again: {}", mid, message);
                        return Err(CrawlError::DetailUnavailable {
                            mid: mid.to_string(),
                            message,
                        });
                    }
                }
            }
        };

        Ok(parse_render_data(&body)?)
    }
}
