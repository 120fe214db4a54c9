//! Human-readable record output

use crate::model::{CommentDepth, CommentRecord, SearchHit};
use crate::output::stats::CrawlStatistics;
use crate::output::traits::{OutputResult, RecordSink};
use std::io::Write;

/// Writes one line per record, indenting replies under their parent
pub struct TextOutput<W: Write> {
    writer: W,
}

impl<W: Write> TextOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for TextOutput<W> {
    fn record_hit(&mut self, hit: &SearchHit) -> OutputResult<()> {
        writeln!(
            self.writer,
            "=== post {} by {} ({})",
            hit.post_id, hit.author_id, hit.created_at
        )?;
        for line in hit.text.lines().filter(|l| !l.trim().is_empty()) {
            writeln!(self.writer, "    {}", line.trim())?;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn record_comment(&mut self, record: &CommentRecord) -> OutputResult<()> {
        let indent = match record.depth {
            CommentDepth::Parent => "",
            CommentDepth::Child => "    ",
        };
        writeln!(
            self.writer,
            "{}[{}] {} {}",
            indent,
            record.depth,
            record.created_at,
            single_line(&record.text)
        )?;
        self.writer.flush()?;
        Ok(())
    }

    fn finalize(&mut self, stats: &CrawlStatistics) -> OutputResult<()> {
        writeln!(
            self.writer,
            "=== {} posts, {} comments, {} replies",
            stats.posts_walked, stats.parent_comments, stats.child_comments
        )?;
        self.writer.flush()?;
        Ok(())
    }
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
