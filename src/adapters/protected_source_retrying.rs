//! Retry wrapper for protected path sources.

use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::warn;

use crate::domain::{AppError, ProtectedSourceConfig};
use crate::ports::ProtectedPathSource;

const DEFAULT_MAX_DELAY_MS: u64 = 30_000;
const MAX_LOG_ERROR_CHARS: usize = 512;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay_ms: u64,
    max_delay_ms: u64,
}

impl RetryPolicy {
    pub fn from_config(config: &ProtectedSourceConfig) -> Self {
        Self {
            max_attempts: config.max_retries.max(1),
            base_delay_ms: config.retry_delay_ms.max(1),
            max_delay_ms: DEFAULT_MAX_DELAY_MS.max(config.retry_delay_ms),
        }
    }

    fn delay_for_retry(&self, failed_attempt: u32) -> Duration {
        // attempt=1 -> base, attempt=2 -> base*2, attempt=3 -> base*4, capped.
        let exponent = failed_attempt.saturating_sub(1).min(6);
        let multiplier = 1_u64 << exponent;
        let backoff_ms = self.base_delay_ms.saturating_mul(multiplier).min(self.max_delay_ms);
        let jitter = jitter_ms(backoff_ms);
        Duration::from_millis(backoff_ms.saturating_add(jitter).min(self.max_delay_ms))
    }
}

pub struct RetryingProtectedSource {
    inner: Box<dyn ProtectedPathSource>,
    policy: RetryPolicy,
}

impl RetryingProtectedSource {
    pub fn new(inner: Box<dyn ProtectedPathSource>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

impl ProtectedPathSource for RetryingProtectedSource {
    fn describe(&self) -> String {
        self.inner.describe()
    }

    fn fetch(&self) -> Result<Vec<String>, AppError> {
        let mut attempt = 1;
        loop {
            let error = match self.inner.fetch() {
                Ok(paths) => return Ok(paths),
                Err(error) => error,
            };
            if !is_retryable_error(&error) || attempt >= self.policy.max_attempts {
                return Err(error);
            }

            let delay = self.policy.delay_for_retry(attempt);
            warn!(
                source = %self.inner.describe(),
                attempt,
                max_attempts = self.policy.max_attempts,
                delay_ms = delay.as_millis() as u64,
                "protected list fetch failed ({}); retrying",
                summarize_failure(&error)
            );
            thread::sleep(delay);
            attempt += 1;
        }
    }
}

fn is_retryable_error(error: &AppError) -> bool {
    match error {
        AppError::ProtectedSource { status: Some(code), .. } => {
            *code == 408 || *code == 429 || *code >= 500
        }
        // No status means the request never completed.
        AppError::ProtectedSource { status: None, .. } => true,
        _ => false,
    }
}

/// Up to a quarter of `backoff_ms`, taken from the clock's sub-second part.
fn jitter_ms(backoff_ms: u64) -> u64 {
    let spread = backoff_ms / 4;
    if spread == 0 {
        return 0;
    }
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.subsec_nanos());
    u64::from(nanos) % spread
}

/// One-line description of a failed fetch: the HTTP status if there was one, then
/// the message with control characters flattened and long bodies cut short.
fn summarize_failure(error: &AppError) -> String {
    let (status, message) = match error {
        AppError::ProtectedSource { status: Some(code), message } => {
            (format!("HTTP {}", code), message.as_str())
        }
        AppError::ProtectedSource { status: None, message } => {
            ("no response".to_string(), message.as_str())
        }
        other => return other.to_string(),
    };

    let flattened: String = message
        .chars()
        .take(MAX_LOG_ERROR_CHARS)
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect();
    let compact = flattened.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut summary = format!("{}: {}", status, compact);
    if message.chars().count() > MAX_LOG_ERROR_CHARS {
        summary.push_str(" [truncated]");
    }
    summary
}
