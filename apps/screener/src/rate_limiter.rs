//! Rate Limiter
//!
//! Spaces out quota-bound external calls with a single process-wide timer.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// Enforces a minimum interval between consecutive calls.
pub struct RateLimiter {
    name: &'static str,
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// `min_interval = ceil(60_000 / requests_per_minute) + buffer_ms`.
    pub fn new(name: &'static str, requests_per_minute: u32, buffer_ms: u64) -> Self {
        Self {
            name,
            min_interval: min_interval(requests_per_minute, buffer_ms),
            last_call: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Waits until `min_interval` has passed since the previous call, then
    /// records this call. Concurrent callers queue on the lock.
    pub async fn wait_if_needed(&self) {
        let mut last_call = self.last_call.lock().await;

        if let Some(previous) = *last_call {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!(
                    limiter = self.name,
                    wait_ms = wait.as_millis() as u64,
                    "Rate limiter waiting"
                );
                sleep(wait).await;
            }
        }

        *last_call = Some(Instant::now());
    }

    /// Forgets the previous call, so the next call goes through immediately.
    pub async fn reset(&self) {
        *self.last_call.lock().await = None;
    }
}

fn min_interval(requests_per_minute: u32, buffer_ms: u64) -> Duration {
    let rpm = u64::from(requests_per_minute.max(1));
    Duration::from_millis(60_000u64.div_ceil(rpm) + buffer_ms)
}
