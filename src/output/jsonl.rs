//! JSON Lines record output

use crate::model::{CommentRecord, SearchHit};
use crate::output::traits::{OutputError, OutputResult, RecordSink};
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Line<'a> {
    Post(&'a SearchHit),
    Comment(&'a CommentRecord),
}

/// Writes every hit and comment as one JSON object per line
pub struct JsonLinesOutput<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, line: &Line<'_>) -> OutputResult<()> {
        serde_json::to_writer(&mut self.writer, line)
            .map_err(|e| OutputError::Format(e.to_string()))?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> RecordSink for JsonLinesOutput<W> {
    fn record_hit(&mut self, hit: &SearchHit) -> OutputResult<()> {
        self.write_line(&Line::Post(hit))
    }

    fn record_comment(&mut self, record: &CommentRecord) -> OutputResult<()> {
        self.write_line(&Line::Comment(record))
    }
}
