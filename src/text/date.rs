use crate::TimestampError;
use chrono::{DateTime, FixedOffset, Local, Months, NaiveDate};
use std::fmt;

/// Timestamp layout used by the comment API, e.g. `Tue Apr 30 07:50:34 +0800 2024`
pub const WEIBO_TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Layout of every timestamp this crate emits
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses a comment API timestamp, keeping its UTC offset
pub fn parse_weibo_timestamp(input: &str) -> Result<DateTime<FixedOffset>, TimestampError> {
    DateTime::parse_from_str(input.trim(), WEIBO_TIMESTAMP_FORMAT).map_err(|source| {
        TimestampError {
            input: input.to_string(),
            source,
        }
    })
}

/// Rewrites a comment API timestamp as `YYYY-MM-DD HH:MM:SS`
///
/// The wall-clock time is kept in the timestamp's own offset.
///
/// # Example
///
/// ```
/// use weibo_comments::text::format_weibo_timestamp;
///
/// let formatted = format_weibo_timestamp("Tue Apr 30 07:50:34 +0800 2024").unwrap();
/// assert_eq!(formatted, "2024-04-30 07:50:34");
/// ```
pub fn format_weibo_timestamp(input: &str) -> Result<String, TimestampError> {
    Ok(parse_weibo_timestamp(input)?
        .format(CANONICAL_FORMAT)
        .to_string())
}

/// Calendar date that replies must be strictly newer than
///
/// Computed once per run. Comparison uses the date component only, in the
/// reply's own offset; time of day is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecencyCutoff(NaiveDate);

impl RecencyCutoff {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// The date `months` calendar months before `today`
    ///
    /// Days past the end of the target month clamp to its last day, so one
    /// month before March 31st is the last day of February.
    pub fn months_before(today: NaiveDate, months: u32) -> Self {
        Self(
            today
                .checked_sub_months(Months::new(months))
                .unwrap_or(NaiveDate::MIN),
        )
    }

    /// The cutoff `months` calendar months before the local current date
    pub fn from_now(months: u32) -> Self {
        Self::months_before(Local::now().date_naive(), months)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// True when `created_at` falls on a later calendar day than the cutoff
    pub fn admits(&self, created_at: &DateTime<FixedOffset>) -> bool {
        created_at.date_naive() > self.0
    }
}

impl fmt::Display for RecencyCutoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}
