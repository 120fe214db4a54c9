//! Output module for crawl records and summaries
//!
//! This module handles:
//! - Streaming search hits and comment records as they are produced
//! - Rendering them as plain text or JSON Lines
//! - Recording and reporting crawl statistics

mod jsonl;
pub mod stats;
mod text;
mod traits;

pub use jsonl::JsonLinesOutput;
pub use stats::{format_statistics, print_statistics, CrawlStatistics};
pub use text::TextOutput;
pub use traits::{CollectingSink, OutputError, OutputResult, RecordSink};

use crate::config::OutputFormat;
use std::io::Write;

/// Builds the sink for a configured output format
pub fn sink_for<'a, W: Write + 'a>(format: OutputFormat, writer: W) -> Box<dyn RecordSink + 'a> {
    match format {
        OutputFormat::Text => Box::new(TextOutput::new(writer)),
        OutputFormat::Jsonl => Box::new(JsonLinesOutput::new(writer)),
    }
}
