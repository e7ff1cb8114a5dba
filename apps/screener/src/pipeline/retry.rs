//! Per-candidate retry state machine.
//!
//! `Attempt(n) → Done(Ok)` on success, `Attempt(n) → Waiting → Attempt(n+1)`
//! on a retryable failure, `Attempt(n) → Done(Err)` once the policy gives up.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use crate::errors::ScreeningError;
use crate::rate_limiter::RateLimiter;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;
pub const DEFAULT_QUOTA_COOLDOWN: Duration = Duration::from_secs(30);
pub const DEFAULT_BACKOFF_BASE: u64 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Fixed wait after a quota rejection, used instead of exponential backoff.
    pub quota_cooldown: Duration,
    /// Backoff after failed attempt `n` is `backoff_base^n` seconds.
    pub backoff_base: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            quota_cooldown: DEFAULT_QUOTA_COOLDOWN,
            backoff_base: DEFAULT_BACKOFF_BASE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RetryDecision {
    Retry {
        delay: Duration,
        reset_limiter: bool,
    },
    GiveUp,
}

impl RetryPolicy {
    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_secs(self.backoff_base.saturating_pow(attempt))
    }

    /// What to do after attempt `attempt` (1-based) failed with `err`.
    pub fn decide(&self, attempt: u32, err: &ScreeningError) -> RetryDecision {
        if !err.is_retryable() || attempt >= self.max_attempts {
            return RetryDecision::GiveUp;
        }

        if err.is_quota() {
            RetryDecision::Retry {
                delay: self.quota_cooldown,
                reset_limiter: true,
            }
        } else {
            RetryDecision::Retry {
                delay: self.backoff(attempt),
                reset_limiter: false,
            }
        }
    }
}

enum AttemptState<T> {
    Attempt(u32),
    Waiting {
        next: u32,
        delay: Duration,
        reset_limiter: bool,
    },
    Done(Result<T, ScreeningError>),
}

/// Drives `operation` through the retry state machine. The limiter is reset
/// before a quota cooldown so its own wait does not stack on top.
pub async fn run_with_retry<F, Fut, T>(
    policy: &RetryPolicy,
    limiter: &RateLimiter,
    label: &str,
    mut operation: F,
) -> Result<T, ScreeningError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, ScreeningError>>,
{
    let mut state = AttemptState::Attempt(1);

    loop {
        state = match state {
            AttemptState::Attempt(n) => match operation(n).await {
                Ok(value) => AttemptState::Done(Ok(value)),
                Err(err) => match policy.decide(n, &err) {
                    RetryDecision::Retry {
                        delay,
                        reset_limiter,
                    } => {
                        warn!(
                            candidate = label,
                            attempt = n,
                            delay_secs = delay.as_secs(),
                            "Attempt failed, retrying: {err}"
                        );
                        AttemptState::Waiting {
                            next: n + 1,
                            delay,
                            reset_limiter,
                        }
                    }
                    RetryDecision::GiveUp => AttemptState::Done(Err(err)),
                },
            },
            AttemptState::Waiting {
                next,
                delay,
                reset_limiter,
            } => {
                if reset_limiter {
                    limiter.reset().await;
                }
                sleep(delay).await;
                AttemptState::Attempt(next)
            }
            AttemptState::Done(result) => return result,
        };
    }
}
