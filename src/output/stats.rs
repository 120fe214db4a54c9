//! Crawl statistics
//!
//! Counters accumulated by the driver as posts are walked, and a plain-text
//! report of them.

use crate::crawler::WalkStats;
use std::fmt::Write as _;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Posts returned by the search listing
    pub posts_listed: u64,

    /// Posts whose comment tree was walked to the end
    pub posts_walked: u64,

    /// Post detail pages read
    pub details_fetched: u64,

    /// Comment-list requests sent
    pub comment_requests: u64,

    /// Pages of top-level comments fetched
    pub parent_pages: u64,

    /// Top-level comments emitted
    pub parent_comments: u64,

    /// Replies emitted
    pub child_comments: u64,

    /// Replies dropped by the recency cutoff
    pub filtered_replies: u64,

    /// Wall-clock time of the run
    pub elapsed: Duration,
}

impl CrawlStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one finished walk into the totals
    pub fn record_walk(&mut self, walk: &WalkStats) {
        self.posts_walked += 1;
        self.comment_requests += walk.requests;
        self.parent_pages += walk.parent_pages;
        self.parent_comments += walk.parents;
        self.child_comments += walk.children;
        self.filtered_replies += walk.filtered;
    }

    /// Comments emitted at both levels
    pub fn total_comments(&self) -> u64 {
        self.parent_comments + self.child_comments
    }

    /// Share of replies dropped by the cutoff, as a percentage
    pub fn filtered_rate(&self) -> f64 {
        let seen = self.child_comments + self.filtered_replies;
        if seen == 0 {
            return 0.0;
        }
        (self.filtered_replies as f64 / seen as f64) * 100.0
    }
}

/// Formats statistics as a human-readable report
pub fn format_statistics(stats: &CrawlStatistics) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Crawl Statistics ===\n");
    let _ = writeln!(out, "Posts:");
    let _ = writeln!(out, "  Listed by search: {}", stats.posts_listed);
    let _ = writeln!(out, "  Comment trees walked: {}", stats.posts_walked);
    if stats.details_fetched > 0 {
        let _ = writeln!(out, "  Details fetched: {}", stats.details_fetched);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Comments:");
    let _ = writeln!(out, "  Requests sent: {}", stats.comment_requests);
    let _ = writeln!(out, "  Top-level pages: {}", stats.parent_pages);
    let _ = writeln!(out, "  Top-level comments: {}", stats.parent_comments);
    let _ = writeln!(out, "  Replies kept: {}", stats.child_comments);
    let _ = writeln!(
        out,
        "  Replies filtered: {} ({:.1}%)",
        stats.filtered_replies,
        stats.filtered_rate()
    );
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "Total: {} comments in {:.1}s",
        stats.total_comments(),
        stats.elapsed.as_secs_f64()
    );

    out
}

/// Prints statistics to stderr, keeping stdout for records
pub fn print_statistics(stats: &CrawlStatistics) {
    eprint!("{}", format_statistics(stats));
}
