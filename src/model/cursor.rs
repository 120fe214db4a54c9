use serde_json::Value;

/// Position in a cursor-paginated comment list
///
/// The service answers every page with a `max_id` telling where the next,
/// older page starts. A numeric zero means the list has no more pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Cursor {
    /// Nothing requested yet
    #[default]
    Start,

    /// Token returned by the previous page
    Next(String),

    /// The service reported the end of the list
    Exhausted,
}

impl Cursor {
    /// Reads the `max_id` a page response carried
    ///
    /// Returns `None` when the value is neither a number nor a non-empty string.
    pub fn from_max_id(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => {
                if n.as_u64() == Some(0) || n.as_i64() == Some(0) {
                    Some(Cursor::Exhausted)
                } else {
                    Some(Cursor::Next(n.to_string()))
                }
            }
            Value::String(s) if s == "0" => Some(Cursor::Exhausted),
            Value::String(s) if !s.is_empty() => Some(Cursor::Next(s.clone())),
            _ => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Cursor::Exhausted)
    }

    /// The token to send on the next request, if one was issued
    pub fn token(&self) -> Option<&str> {
        match self {
            Cursor::Next(token) => Some(token),
            _ => None,
        }
    }
}
