//! Rate limit tracking and retry arbitration for the Webflow API.
//!
//! Every response's headers are forwarded here, keeping a last-write-wins
//! snapshot of the remaining quota. When a request hits a 429 the
//! coordinator decides, per the configured [`RateLimitStrategy`], whether
//! the caller should fail immediately, wait and retry, or wait in line
//! behind the client's other rate-limited retries.

use std::str::FromStr;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::header::HeaderMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::clients::errors::WebflowError;

/// How the client reacts to a 429 response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RateLimitStrategy {
    /// Serialize rate-limited retries so only one is in flight at a time.
    Queue,
    /// Surface the rate limit error immediately, without retrying.
    Throw,
    /// Wait out the advertised delay and retry, bounded by the retry ceiling.
    #[default]
    Retry,
}

/// A snapshot of the quota signals from the most recent response.
///
/// The data is advisory telemetry for callers ("try again in N seconds"
/// messaging) and for the 429 retry path; it is not used for any other
/// correctness-critical gating.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Requests remaining in the current window.
    pub remaining: u32,
    /// Total requests allowed per window.
    pub limit: u32,
    /// When the window resets, as epoch milliseconds.
    pub reset_time: i64,
    /// How long the server asked us to wait before retrying.
    pub retry_after: Duration,
}

impl Default for RateLimitInfo {
    fn default() -> Self {
        Self {
            remaining: 0,
            limit: 100,
            reset_time: 0,
            retry_after: Duration::ZERO,
        }
    }
}

impl RateLimitInfo {
    /// Parses quota signals from response headers.
    ///
    /// Consumes `x-ratelimit-remaining`, `x-ratelimit-limit`,
    /// `x-ratelimit-reset` (seconds since epoch) and `retry-after`
    /// (seconds). Missing or malformed headers fall back to the defaults.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            remaining: header_value(headers, "x-ratelimit-remaining").unwrap_or(0),
            limit: header_value(headers, "x-ratelimit-limit").unwrap_or(100),
            reset_time: header_value::<i64>(headers, "x-ratelimit-reset")
                .map_or(0, |secs| secs.saturating_mul(1000)),
            retry_after: header_value(headers, "retry-after")
                .map_or(Duration::ZERO, Duration::from_secs),
        }
    }
}

fn header_value<T: FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

/// Observes quota signals and arbitrates 429 retries for one client.
#[derive(Debug)]
pub(crate) struct RateLimiter {
    strategy: RateLimitStrategy,
    /// Fallback wait when the server sends no `retry-after`.
    default_delay: Duration,
    info: RwLock<RateLimitInfo>,
    queue: Arc<Mutex<()>>,
}

impl RateLimiter {
    pub(crate) fn new(strategy: RateLimitStrategy, default_delay: Duration) -> Self {
        Self {
            strategy,
            default_delay,
            info: RwLock::new(RateLimitInfo::default()),
            queue: Arc::new(Mutex::new(())),
        }
    }

    /// Overwrites the stored snapshot from the latest response headers.
    ///
    /// Last write wins; concurrent requests racing here is accepted
    /// imprecision since the data is advisory.
    pub(crate) fn update_from_headers(&self, headers: &HeaderMap) {
        let info = RateLimitInfo::from_headers(headers);
        *self.info.write().expect("rate limit state poisoned") = info;
    }

    /// Returns a copy of the current snapshot.
    pub(crate) fn snapshot(&self) -> RateLimitInfo {
        *self.info.read().expect("rate limit state poisoned")
    }

    /// Decides how a 429 on attempt `attempt` should be handled.
    ///
    /// Returns `Ok` when the caller should retry, after this method has
    /// already waited out the delay. Under [`RateLimitStrategy::Queue`] the
    /// returned guard must be held across the retried dispatch so that only
    /// one rate-limited request is in flight per client.
    pub(crate) async fn handle_rate_limit(
        &self,
        info: RateLimitInfo,
        attempt: u32,
        max_retries: u32,
    ) -> Result<Option<OwnedMutexGuard<()>>, WebflowError> {
        let rate_limited = || WebflowError::RateLimit {
            message: "too many requests".to_string(),
            info,
        };

        match self.strategy {
            RateLimitStrategy::Throw => Err(rate_limited()),
            RateLimitStrategy::Retry | RateLimitStrategy::Queue if attempt >= max_retries => {
                Err(rate_limited())
            }
            RateLimitStrategy::Retry => {
                let delay = self.retry_delay(&info);
                tracing::warn!(
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    attempt,
                    "rate limited, retrying after delay"
                );
                tokio::time::sleep(delay).await;
                Ok(None)
            }
            RateLimitStrategy::Queue => {
                let slot = Arc::clone(&self.queue).lock_owned().await;
                let delay = self.retry_delay(&info);
                tracing::warn!(
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    attempt,
                    "rate limited, retry queued"
                );
                tokio::time::sleep(delay).await;
                Ok(Some(slot))
            }
        }
    }

    fn retry_delay(&self, info: &RateLimitInfo) -> Duration {
        if info.retry_after > Duration::ZERO {
            info.retry_after
        } else {
            self.default_delay
        }
    }
}
