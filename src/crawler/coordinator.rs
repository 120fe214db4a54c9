//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the driver that ties the components together:
//! - Resolving the recency cutoff once per run
//! - Listing posts from the search results
//! - Optionally reading each post's detail page
//! - Walking each post's comment tree, one post at a time

use crate::config::Config;
use crate::crawler::detail::{PostDetail, PostDetailFetcher};
use crate::crawler::limiter::{FixedIntervalLimiter, RateLimiter};
use crate::crawler::search::SearchResultLister;
use crate::crawler::walker::CommentTreeWalker;
use crate::crawler::build_http_client;
use crate::output::{CrawlStatistics, RecordSink};
use crate::text::RecencyCutoff;
use crate::Result;
use std::sync::Arc;
use std::time::Instant;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    lister: SearchResultLister,
    walker: CommentTreeWalker,
    details: PostDetailFetcher,
    cutoff: RecencyCutoff,
}

impl Coordinator {
    /// Creates a coordinator that paces requests with the configured delays
    pub fn new(config: Config) -> Result<Self> {
        let limiter = Arc::new(FixedIntervalLimiter::from_config(&config.crawler));
        Self::with_limiter(config, limiter)
    }

    /// Creates a coordinator around an explicit rate limiter
    ///
    /// The recency cutoff is resolved here, once, from `months-ago`.
    pub fn with_limiter(config: Config, limiter: Arc<dyn RateLimiter>) -> Result<Self> {
        let client = build_http_client(&config.client)?;
        let cutoff = RecencyCutoff::from_now(config.crawler.months_ago);

        let lister = SearchResultLister::new(client.clone(), config.endpoints.search_url.clone());
        let walker = CommentTreeWalker::new(
            client.clone(),
            config.endpoints.comments_url.clone(),
            limiter.clone(),
        );
        let details = PostDetailFetcher::new(client, config.endpoints.detail_url.clone(), limiter);

        Ok(Self {
            config: Arc::new(config),
            lister,
            walker,
            details,
            cutoff,
        })
    }

    /// Replaces the resolved cutoff with a fixed date
    pub fn with_cutoff(mut self, cutoff: RecencyCutoff) -> Self {
        self.cutoff = cutoff;
        self
    }

    pub fn cutoff(&self) -> RecencyCutoff {
        self.cutoff
    }

    /// Looks up a single post's detail page
    pub async fn fetch_detail(&self, mid: &str) -> Result<PostDetail> {
        self.details.fetch(mid).await
    }

    /// Runs the crawl, streaming every hit and comment into `sink`
    ///
    /// Posts are walked strictly one after another. A failure while walking
    /// a post, or a failed detail lookup, ends the run; output already
    /// written to the sink is kept.
    pub async fn run(&self, sink: &mut dyn RecordSink) -> Result<CrawlStatistics> {
        let start_time = Instant::now();
        let mut stats = CrawlStatistics::new();
        let search = &self.config.search;

        tracing::info!(
            "Searching for '{}' over {} page(s); keeping replies newer than {}",
            search.query,
            search.max_pages,
            self.cutoff
        );

        let hits = self.lister.list(&search.query, search.max_pages).await?;
        stats.posts_listed = hits.len() as u64;
        tracing::info!("Search listed {} posts", hits.len());

        for (index, hit) in hits.iter().enumerate() {
            tracing::info!(
                "Walking post {}/{}: {} (author {})",
                index + 1,
                hits.len(),
                hit.post_id,
                hit.author_id
            );

            if self.config.crawler.fetch_post_details {
                let detail = self.details.fetch(&hit.post_id).await?;
                stats.details_fetched += 1;
                tracing::info!(
                    "Post {} by {} ({}) created {}, {} comments",
                    hit.post_id,
                    detail.screen_name,
                    detail.user_id,
                    detail.created_at,
                    detail.comments_count
                );
            }

            sink.record_hit(hit)?;
            let walk = self
                .walker
                .walk(&hit.post_id, &hit.author_id, &self.cutoff, sink)
                .await?;
            stats.record_walk(&walk);

            tracing::info!(
                "Post {} done: {} comments, {} replies kept, {} filtered, {} requests",
                hit.post_id,
                walk.parents,
                walk.children,
                walk.filtered,
                walk.requests
            );
        }

        stats.elapsed = start_time.elapsed();
        sink.finalize(&stats)?;

        tracing::info!(
            "Crawl completed: {} posts, {} comments in {:?}",
            stats.posts_walked,
            stats.total_comments(),
            stats.elapsed
        );

        Ok(stats)
    }
}
