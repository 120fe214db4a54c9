//! Comment tree walker
//!
//! Walks every top-level comment of a post and, under each, every reply.
//! The top-level list and each reply list are separate [`CommentPager`]s,
//! composed by nesting: exhausting one never touches another.
//!
//! Top-level comments are always emitted. Replies are emitted only when
//! their calendar date is strictly after the recency cutoff; older replies
//! are dropped but their list is still paged to the end.

use crate::crawler::comments::{CommentEntry, CommentPage, CommentPager};
use crate::crawler::limiter::{Pause, RateLimiter};
use crate::model::{CommentDepth, CommentRecord};
use crate::output::RecordSink;
use crate::text::{clean_html, parse_weibo_timestamp, RecencyCutoff, CANONICAL_FORMAT};
use crate::{CrawlError, Result};
use chrono::{DateTime, FixedOffset};
use reqwest::Client;
use std::sync::Arc;

/// Counters for one post's walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Requests sent, both levels
    pub requests: u64,

    /// Pages of top-level comments fetched
    pub parent_pages: u64,

    /// Top-level comments emitted
    pub parents: u64,

    /// Replies emitted
    pub children: u64,

    /// Replies dropped by the recency cutoff
    pub filtered: u64,
}

/// Walks the comment tree of one post at a time
pub struct CommentTreeWalker {
    client: Client,
    comments_url: String,
    limiter: Arc<dyn RateLimiter>,
}

impl CommentTreeWalker {
    /// Creates a walker against the given comment-list endpoint
    pub fn new(
        client: Client,
        comments_url: impl Into<String>,
        limiter: Arc<dyn RateLimiter>,
    ) -> Self {
        Self {
            client,
            comments_url: comments_url.into(),
            limiter,
        }
    }

    /// Walks a post's comments, streaming records into `sink`
    ///
    /// # Walk Order
    ///
    /// 1. Fetch a page of top-level comments
    /// 2. For each comment: emit it, then page through all of its replies
    /// 3. If the top-level cursor is not exhausted, take a
    ///    [`Pause::BetweenPages`] and go back to 1
    ///
    /// # Errors
    ///
    /// Any request failure, malformed response or unparseable timestamp
    /// ends the walk. Records already handed to the sink stay there.
    pub async fn walk(
        &self,
        post_id: &str,
        author_id: &str,
        cutoff: &RecencyCutoff,
        sink: &mut dyn RecordSink,
    ) -> Result<WalkStats> {
        let mut stats = WalkStats::default();
        let mut parents = CommentPager::parents(post_id, author_id);

        let result = self
            .walk_parents(&mut parents, author_id, cutoff, sink, &mut stats)
            .await;
        stats.requests += u64::from(parents.requests_made());

        result.map(|()| stats)
    }

    async fn walk_parents(
        &self,
        parents: &mut CommentPager,
        author_id: &str,
        cutoff: &RecencyCutoff,
        sink: &mut dyn RecordSink,
        stats: &mut WalkStats,
    ) -> Result<()> {
        while let Some(page) = parents
            .fetch_next_page(&self.client, &self.comments_url, self.limiter.as_ref())
            .await?
        {
            stats.parent_pages += 1;
            tracing::debug!(
                "Parent page {} of {} entries",
                stats.parent_pages,
                page.entries.len()
            );

            for entry in &page.entries {
                let created_at = parse_weibo_timestamp(&entry.created_at)?;
                sink.record_comment(&to_record(&page, entry, &created_at, CommentDepth::Parent))?;
                stats.parents += 1;

                let comment_id = entry.id_string().ok_or_else(|| CrawlError::Protocol {
                    url: page.source_url.clone(),
                    message: "top-level comment without an id".to_string(),
                })?;
                self.walk_replies(&comment_id, author_id, cutoff, sink, stats)
                    .await?;
            }

            if parents.is_exhausted() {
                break;
            }
            self.limiter.pause(Pause::BetweenPages).await;
        }

        Ok(())
    }

    async fn walk_replies(
        &self,
        comment_id: &str,
        author_id: &str,
        cutoff: &RecencyCutoff,
        sink: &mut dyn RecordSink,
        stats: &mut WalkStats,
    ) -> Result<()> {
        let mut replies = CommentPager::replies(comment_id, author_id);

        let result = self
            .drain_replies(&mut replies, cutoff, sink, stats)
            .await;
        stats.requests += u64::from(replies.requests_made());

        result
    }

    async fn drain_replies(
        &self,
        replies: &mut CommentPager,
        cutoff: &RecencyCutoff,
        sink: &mut dyn RecordSink,
        stats: &mut WalkStats,
    ) -> Result<()> {
        while let Some(page) = replies
            .fetch_next_page(&self.client, &self.comments_url, self.limiter.as_ref())
            .await?
        {
            for entry in &page.entries {
                let created_at = parse_weibo_timestamp(&entry.created_at)?;
                if !cutoff.admits(&created_at) {
                    stats.filtered += 1;
                    continue;
                }

                sink.record_comment(&to_record(&page, entry, &created_at, CommentDepth::Child))?;
                stats.children += 1;
            }
        }

        Ok(())
    }
}

fn to_record(
    page: &CommentPage,
    entry: &CommentEntry,
    created_at: &DateTime<FixedOffset>,
    depth: CommentDepth,
) -> CommentRecord {
    CommentRecord {
        source_url: page.source_url.clone(),
        text: clean_html(entry.body()),
        created_at: created_at.format(CANONICAL_FORMAT).to_string(),
        depth,
    }
}
