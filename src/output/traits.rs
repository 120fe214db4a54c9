//! Output handler traits and types
//!
//! This module defines the sink interface records are streamed into while a
//! crawl runs, and the error type sinks report.

use crate::model::{CommentRecord, SearchHit};
use crate::output::stats::CrawlStatistics;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Receives crawl output as it is produced
///
/// Records arrive in walk order: a post's hit first, then each top-level
/// comment followed by its admitted replies.
pub trait RecordSink {
    /// Records the search hit whose comments are about to be walked
    fn record_hit(&mut self, hit: &SearchHit) -> OutputResult<()>;

    /// Records one emitted comment
    fn record_comment(&mut self, record: &CommentRecord) -> OutputResult<()>;

    /// Called once after the last post, with the run's statistics
    fn finalize(&mut self, _stats: &CrawlStatistics) -> OutputResult<()> {
        Ok(())
    }
}

/// Keeps everything in memory
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    pub hits: Vec<SearchHit>,
    pub comments: Vec<CommentRecord>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordSink for CollectingSink {
    fn record_hit(&mut self, hit: &SearchHit) -> OutputResult<()> {
        self.hits.push(hit.clone());
        Ok(())
    }

    fn record_comment(&mut self, record: &CommentRecord) -> OutputResult<()> {
        self.comments.push(record.clone());
        Ok(())
    }
}
