//! Retry logic for API calls: status classification and exponential backoff.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

/// Maximum number of retries after the first attempt.
pub const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff in milliseconds.
pub const RETRY_DELAY_MS: u64 = 1000;

/// What to do with a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Transient failure, the request may succeed if sent again.
    Retry,
    /// Terminal failure, sending the same request again won't help.
    Fail,
}

/// Classifies a non-success HTTP status.
///
/// Client errors (4xx) are terminal, except 408 (request timeout) and
/// 429 (too many requests). Everything else, 5xx included, is retried.
pub fn classify_status(status: StatusCode) -> RetryDecision {
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS => RetryDecision::Retry,
        s if s.is_client_error() => RetryDecision::Fail,
        _ => RetryDecision::Retry,
    }
}

/// Retry cap and backoff seed. Fixed once the client is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            base_delay: Duration::from_millis(RETRY_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Delay before retry number `retry_index` (0 for the first retry):
    /// `base_delay * 2^retry_index`.
    pub fn delay_for(&self, retry_index: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(retry_index))
    }

    /// Whether another retry is allowed after `retry_index` retries.
    pub fn can_retry(&self, retry_index: u32) -> bool {
        retry_index < self.max_retries
    }
}

/// Suspends the current task between attempts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
