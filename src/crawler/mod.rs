//! Crawler module for search listing and comment tree walking
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and response decoding
//! - Search result listing
//! - Cursor-driven pagination of comment lists
//! - The two-level comment tree walk
//! - Post detail lookup with a single retry
//! - Request pacing
//! - Overall crawl coordination

mod comments;
mod coordinator;
mod detail;
mod fetcher;
mod limiter;
mod search;
mod walker;

pub use comments::{CommentEntry, CommentLevel, CommentPage, CommentPager};
pub use coordinator::Coordinator;
pub use detail::{parse_render_data, PostDetail, PostDetailFetcher};
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use limiter::{FixedIntervalLimiter, Pause, RateLimiter, RecordingLimiter};
pub use search::{author_id_from_profile_link, extract_hits, SearchResultLister};
pub use walker::{CommentTreeWalker, WalkStats};
