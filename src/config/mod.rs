//! Configuration types for the Webflow API client.
//!
//! The main types here are [`WebflowConfig`] and its builder. Configuration
//! is immutable after construction and instance-based: the environment is
//! the boundary that populates the struct once, at startup, and the client
//! never reads environment variables itself.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use webflow_api::{RateLimitStrategy, WebflowConfig};
//!
//! let config = WebflowConfig::builder()
//!     .timeout(Duration::from_secs(10))
//!     .retries(2)
//!     .rate_limit_strategy(RateLimitStrategy::Queue)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.retries(), 2);
//! ```

use std::time::Duration;

use crate::clients::{RateLimitStrategy, WebflowError};

/// Default base URL for the Webflow REST API.
pub const DEFAULT_BASE_URL: &str = "https://api.webflow.com/v2";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_RETRIES: u32 = 3;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Configuration for the Webflow API client.
///
/// Immutable after construction; use [`WebflowConfig::builder`] to set
/// fields. `Clone`, `Send` and `Sync`, so it can be shared across tasks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebflowConfig {
    base_url: String,
    timeout: Duration,
    retries: u32,
    retry_delay: Duration,
    rate_limit_strategy: RateLimitStrategy,
}

impl WebflowConfig {
    /// Creates a new builder for constructing a `WebflowConfig`.
    #[must_use]
    pub fn builder() -> WebflowConfigBuilder {
        WebflowConfigBuilder::default()
    }

    /// Returns the base URL requests are issued against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the retry ceiling shared by the 429 and 5xx retry paths.
    #[must_use]
    pub const fn retries(&self) -> u32 {
        self.retries
    }

    /// Returns the base delay for exponential backoff, also used as the
    /// fallback rate-limit wait when the server sends no `retry-after`.
    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    /// Returns how the client reacts to 429 responses.
    #[must_use]
    pub const fn rate_limit_strategy(&self) -> RateLimitStrategy {
        self.rate_limit_strategy
    }
}

impl Default for WebflowConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            rate_limit_strategy: RateLimitStrategy::default(),
        }
    }
}

// Verify WebflowConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<WebflowConfig>();
};

/// Builder for constructing [`WebflowConfig`] instances.
///
/// # Defaults
///
/// - `base_url`: [`DEFAULT_BASE_URL`]
/// - `timeout`: 30 seconds
/// - `retries`: 3
/// - `retry_delay`: 1 second
/// - `rate_limit_strategy`: [`RateLimitStrategy::Retry`]
#[derive(Debug, Default)]
pub struct WebflowConfigBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    retries: Option<u32>,
    retry_delay: Option<Duration>,
    rate_limit_strategy: Option<RateLimitStrategy>,
}

impl WebflowConfigBuilder {
    /// Sets the base URL requests are issued against.
    ///
    /// A trailing slash is stripped so endpoint paths can always start
    /// with `/`.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the retry ceiling.
    #[must_use]
    pub const fn retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    /// Sets the base backoff delay.
    #[must_use]
    pub const fn retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = Some(retry_delay);
        self
    }

    /// Sets the 429 handling strategy.
    #[must_use]
    pub const fn rate_limit_strategy(mut self, strategy: RateLimitStrategy) -> Self {
        self.rate_limit_strategy = Some(strategy);
        self
    }

    /// Builds the [`WebflowConfig`], validating the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`WebflowError::Config`] if the base URL is empty or does
    /// not use an `http`/`https` scheme.
    pub fn build(self) -> Result<WebflowConfig, WebflowError> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = base_url.trim().trim_end_matches('/').to_string();

        if base_url.is_empty() {
            return Err(WebflowError::Config {
                message: "base URL must not be empty".to_string(),
            });
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(WebflowError::Config {
                message: format!("base URL '{base_url}' must use an http or https scheme"),
            });
        }

        Ok(WebflowConfig {
            base_url,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            retries: self.retries.unwrap_or(DEFAULT_RETRIES),
            retry_delay: self.retry_delay.unwrap_or(DEFAULT_RETRY_DELAY),
            rate_limit_strategy: self.rate_limit_strategy.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = WebflowConfig::builder().build().unwrap();

        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.retries(), 3);
        assert_eq!(config.retry_delay(), Duration::from_secs(1));
        assert_eq!(config.rate_limit_strategy(), RateLimitStrategy::Retry);
    }

    #[test]
    fn test_builder_defaults_match_default_impl() {
        assert_eq!(WebflowConfig::builder().build().unwrap(), WebflowConfig::default());
    }

    #[test]
    fn test_builder_with_all_fields() {
        let config = WebflowConfig::builder()
            .base_url("https://api.example.com/v1")
            .timeout(Duration::from_secs(5))
            .retries(1)
            .retry_delay(Duration::from_millis(250))
            .rate_limit_strategy(RateLimitStrategy::Throw)
            .build()
            .unwrap();

        assert_eq!(config.base_url(), "https://api.example.com/v1");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.retries(), 1);
        assert_eq!(config.retry_delay(), Duration::from_millis(250));
        assert_eq!(config.rate_limit_strategy(), RateLimitStrategy::Throw);
    }

    #[test]
    fn test_trailing_slash_is_stripped() {
        let config = WebflowConfig::builder()
            .base_url("https://api.example.com/v1/")
            .build()
            .unwrap();

        assert_eq!(config.base_url(), "https://api.example.com/v1");
    }

    #[test]
    fn test_empty_base_url_is_rejected() {
        let result = WebflowConfig::builder().base_url("").build();
        assert!(matches!(result, Err(WebflowError::Config { .. })));
    }

    #[test]
    fn test_non_http_base_url_is_rejected() {
        let result = WebflowConfig::builder().base_url("ftp://example.com").build();
        assert!(matches!(result, Err(WebflowError::Config { .. })));
    }

    #[test]
    fn test_config_is_clone_and_debug() {
        let config = WebflowConfig::default();
        let cloned = config.clone();
        assert_eq!(cloned, config);
        assert!(format!("{config:?}").contains("WebflowConfig"));
    }
}
