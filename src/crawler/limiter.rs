//! Request pacing
//!
//! Every pause the crawler takes goes through a [`RateLimiter`], injected into
//! the walker and the detail fetcher at construction. The production limiter
//! sleeps for fixed intervals; [`RecordingLimiter`] only records what was
//! asked of it, so walks can run without real delays.

use crate::config::CrawlerConfig;
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// The points at which the crawler pauses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pause {
    /// After every comment-list request, at either level
    AfterRequest,
    /// Between two pages of top-level comments
    BetweenPages,
    /// Before the single retry of a failed detail lookup
    BeforeRetry,
}

/// A gate the crawler waits on before continuing
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Waits out the given pause
    async fn pause(&self, pause: Pause);
}

/// Sleeps a fixed interval per pause kind
#[derive(Debug, Clone)]
pub struct FixedIntervalLimiter {
    after_request: Duration,
    between_pages: Duration,
    before_retry: Duration,
}

impl FixedIntervalLimiter {
    pub fn new(after_request: Duration, between_pages: Duration, before_retry: Duration) -> Self {
        Self {
            after_request,
            between_pages,
            before_retry,
        }
    }

    /// Builds the limiter from the crawler's configured delays
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(
            Duration::from_millis(config.request_delay_ms),
            Duration::from_millis(config.page_delay_ms),
            Duration::from_millis(config.retry_delay_ms),
        )
    }

    /// The interval slept for a given pause
    pub fn interval(&self, pause: Pause) -> Duration {
        match pause {
            Pause::AfterRequest => self.after_request,
            Pause::BetweenPages => self.between_pages,
            Pause::BeforeRetry => self.before_retry,
        }
    }
}

#[async_trait]
impl RateLimiter for FixedIntervalLimiter {
    async fn pause(&self, pause: Pause) {
        let interval = self.interval(pause);
        if interval.is_zero() {
            return;
        }
        tracing::trace!("Pausing {:?} ({:?})", interval, pause);
        tokio::time::sleep(interval).await;
    }
}

/// Records requested pauses without sleeping
#[derive(Debug, Default)]
pub struct RecordingLimiter {
    pauses: Mutex<Vec<Pause>>,
}

impl RecordingLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every pause requested so far, in order
    pub fn pauses(&self) -> Vec<Pause> {
        self.pauses
            .lock()
            .map(|pauses| pauses.clone())
            .unwrap_or_default()
    }

    /// How many pauses of one kind were requested
    pub fn count(&self, kind: Pause) -> usize {
        self.pauses().into_iter().filter(|p| *p == kind).count()
    }
}

#[async_trait]
impl RateLimiter for RecordingLimiter {
    async fn pause(&self, pause: Pause) {
        if let Ok(mut pauses) = self.pauses.lock() {
            pauses.push(pause);
        }
    }
}
