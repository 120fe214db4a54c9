//! Records produced by a crawl
//!
//! Search hits come out of the result lister, comment records out of the
//! comment tree walker. Both are plain immutable values.

mod cursor;

pub use cursor::Cursor;

use serde::Serialize;
use std::fmt;

/// One post matched by a search query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    /// The post's mid
    pub post_id: String,

    /// Numeric id of the post's author, taken from the profile link
    pub author_id: String,

    /// Creation date exactly as the result page renders it
    pub created_at: String,

    /// Post body with zero-width spaces removed
    pub text: String,
}

/// Where a comment sits in a post's comment tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentDepth {
    /// A top-level comment on the post
    Parent,
    /// A reply to a top-level comment
    Child,
}

impl fmt::Display for CommentDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommentDepth::Parent => write!(f, "parent"),
            CommentDepth::Child => write!(f, "child"),
        }
    }
}

/// A cleaned comment emitted by the walker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentRecord {
    /// Full URL of the request whose response carried this comment
    pub source_url: String,

    /// Plain text with all markup removed
    pub text: String,

    /// Creation time as `YYYY-MM-DD HH:MM:SS`
    pub created_at: String,

    pub depth: CommentDepth,
}
