//! HTTP client for Webflow API communication.
//!
//! This module provides the [`HttpClient`] type: the single choke point
//! for every outbound call, owning auth-header injection, timeout
//! enforcement, retry orchestration and response decoding.

use std::sync::RwLock;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::OwnedMutexGuard;

use crate::auth::OAuthToken;
use crate::clients::errors::{ApiErrorBody, WebflowError};
use crate::clients::query::build_query_string;
use crate::clients::rate_limit::{RateLimitInfo, RateLimiter};
use crate::config::WebflowConfig;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making authenticated requests to the Webflow API.
///
/// The client handles:
/// - Bearer token injection and lazy per-request expiry checking
/// - Per-request timeouts via the underlying abort-capable transport
/// - Automatic retries with exponential backoff for 5xx and transport errors
/// - Rate-limit-aware 429 handling per the configured strategy
/// - JSON response decoding and typed error classification
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`. The token and rate-limit snapshot are the
/// only mutable shared state; both are replaced whole with last-write-wins
/// semantics.
///
/// # Example
///
/// ```rust,ignore
/// use webflow_api::{HttpClient, OAuthToken, WebflowConfig};
///
/// let client = HttpClient::new(
///     OAuthToken::new("access-token"),
///     WebflowConfig::default(),
/// )?;
///
/// let sites: serde_json::Value = client.get("/sites", None).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    config: WebflowConfig,
    /// Replaced wholesale by `update_token`; read on every request.
    token: RwLock<OAuthToken>,
    rate_limiter: RateLimiter,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new client for the given token and configuration.
    ///
    /// # Errors
    ///
    /// Returns [`WebflowError::Config`] if the token's `access_token` is
    /// empty. The check happens here so misconfiguration fails at
    /// construction time, before any network call.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This
    /// should only happen in extremely unusual circumstances (e.g., TLS
    /// initialization failure).
    pub fn new(token: OAuthToken, config: WebflowConfig) -> Result<Self, WebflowError> {
        if !token.is_valid() {
            return Err(WebflowError::invalid_token());
        }

        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent = format!("Webflow API Library v{SDK_VERSION} | Rust {rust_version}");

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .user_agent(user_agent)
            .build()
            .expect("Failed to create HTTP client");

        let rate_limiter = RateLimiter::new(config.rate_limit_strategy(), config.retry_delay());

        Ok(Self {
            client,
            config,
            token: RwLock::new(token),
            rate_limiter,
        })
    }

    /// Returns a copy of this client's configuration.
    #[must_use]
    pub fn config(&self) -> WebflowConfig {
        self.config.clone()
    }

    /// Returns a copy of the latest rate limit snapshot.
    ///
    /// The snapshot reflects the headers of the most recent response this
    /// client observed, for "try again in N seconds" style display.
    #[must_use]
    pub fn rate_limit_info(&self) -> RateLimitInfo {
        self.rate_limiter.snapshot()
    }

    /// Replaces the stored token.
    ///
    /// In-flight requests begun with the prior token are unaffected.
    ///
    /// # Errors
    ///
    /// Returns [`WebflowError::Config`] if the new token's `access_token`
    /// is empty; the stored token is left unchanged in that case.
    pub fn update_token(&self, token: OAuthToken) -> Result<(), WebflowError> {
        if !token.is_valid() {
            return Err(WebflowError::invalid_token());
        }
        *self.token.write().expect("token state poisoned") = token;
        Ok(())
    }

    /// Issues a GET request to `endpoint`, appending the query string.
    ///
    /// Query keys with a `None` value are omitted; see
    /// [`build_query_string`].
    ///
    /// # Errors
    ///
    /// Returns [`WebflowError`] per the classification documented on that
    /// type.
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: Option<&[(&str, Option<String>)]>,
    ) -> Result<T, WebflowError> {
        let url = format!(
            "{}{}{}",
            self.config.base_url(),
            endpoint,
            build_query_string(query)
        );
        self.execute_request(Method::GET, url, None, None, None).await
    }

    /// Issues a POST request to `endpoint`, JSON-serializing `body` when
    /// present.
    ///
    /// # Errors
    ///
    /// Returns [`WebflowError`] on serialization or request failure.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<T, WebflowError> {
        let url = format!("{}{}", self.config.base_url(), endpoint);
        self.execute_request(Method::POST, url, serialize_body(body)?, None, None)
            .await
    }

    /// Issues a PATCH request to `endpoint`, JSON-serializing `body` when
    /// present.
    ///
    /// # Errors
    ///
    /// Returns [`WebflowError`] on serialization or request failure.
    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<T, WebflowError> {
        let url = format!("{}{}", self.config.base_url(), endpoint);
        self.execute_request(Method::PATCH, url, serialize_body(body)?, None, None)
            .await
    }

    /// Issues a DELETE request to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`WebflowError`] per the classification documented on that
    /// type.
    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, WebflowError> {
        let url = format!("{}{}", self.config.base_url(), endpoint);
        self.execute_request(Method::DELETE, url, None, None, None)
            .await
    }

    /// Executes a request with retry orchestration.
    ///
    /// The retry loop is bounded by the configured `retries` ceiling, which
    /// is shared between the 429, 5xx and transport-error paths. Waits
    /// between 5xx/transport retries follow `2^attempt * retry_delay`; 429
    /// waits are decided by the rate limit coordinator.
    ///
    /// Extra headers are merged beneath the mandatory ones: callers cannot
    /// override `Authorization`. A `timeout` of `Some` replaces the
    /// configured per-request timeout for this call only; each attempt
    /// gets the full duration.
    ///
    /// # Errors
    ///
    /// Returns [`WebflowError`]:
    /// - `Auth` if the stored token is expired (checked before dispatch)
    ///   or the server returns 401
    /// - `RateLimit` once 429 retries are exhausted or the strategy is
    ///   `Throw`
    /// - `Validation` for non-retryable 4xx responses
    /// - `Server` for 5xx responses after retries are exhausted
    /// - `Network` for timeouts, connection failures and body decode
    ///   failures
    pub async fn execute_request<T: DeserializeOwned>(
        &self,
        method: Method,
        url: String,
        body: Option<serde_json::Value>,
        extra_headers: Option<HeaderMap>,
        timeout: Option<Duration>,
    ) -> Result<T, WebflowError> {
        let timeout = timeout.unwrap_or(self.config.timeout());
        let mut attempt: u32 = 0;
        let mut queue_slot: Option<OwnedMutexGuard<()>> = None;

        loop {
            // Token staleness is checked lazily, per attempt.
            let access_token = self.fresh_access_token()?;

            let headers = build_headers(&access_token, extra_headers.as_ref())?;
            let mut request = self
                .client
                .request(method.clone(), &url)
                .timeout(timeout)
                .headers(headers);
            if let Some(body) = &body {
                request = request.json(body);
            }

            tracing::debug!(%method, %url, attempt, "dispatching request");
            let result = request.send().await;

            // A response (or transport failure) arrived; release the
            // queued-retry slot, if held.
            drop(queue_slot.take());

            let response = match result {
                Ok(response) => response,
                Err(error) => {
                    let error = WebflowError::from_network_error(error);
                    if attempt < self.config.retries() && !error.signals_token_expiry() {
                        let delay = backoff_delay(attempt, self.config.retry_delay());
                        tracing::warn!(
                            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                            attempt,
                            %error,
                            "transport error, retrying after backoff"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(error);
                }
            };

            // Quota signals are forwarded on every response, success or not.
            self.rate_limiter.update_from_headers(response.headers());
            let status = response.status();

            if status == StatusCode::NO_CONTENT {
                return decode_empty();
            }

            if status.is_success() {
                // Decode failures on a 2xx are a defect to surface, not
                // something to retry.
                return response.json::<T>().await.map_err(|error| {
                    WebflowError::Network {
                        message: format!("failed to decode response body: {error}"),
                        source: Some(Box::new(error)),
                    }
                });
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                let info = RateLimitInfo::from_headers(response.headers());
                queue_slot = self
                    .rate_limiter
                    .handle_rate_limit(info, attempt, self.config.retries())
                    .await?;
                attempt += 1;
                continue;
            }

            if status.is_server_error() && attempt < self.config.retries() {
                let delay = backoff_delay(attempt, self.config.retry_delay());
                tracing::warn!(
                    code = status.as_u16(),
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    attempt,
                    "server error, retrying after backoff"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            let headers = response.headers().clone();
            let error_body = response.json::<ApiErrorBody>().await.ok();
            return Err(WebflowError::from_response(
                status,
                &headers,
                error_body.as_ref(),
            ));
        }
    }

    fn fresh_access_token(&self) -> Result<String, WebflowError> {
        let token = self.token.read().expect("token state poisoned");
        if token.expired() {
            return Err(WebflowError::token_expired());
        }
        Ok(token.access_token.clone())
    }
}

/// The wait before retry number `attempt`: `2^attempt * base`.
pub(crate) const fn backoff_delay(attempt: u32, base: Duration) -> Duration {
    base.saturating_mul(2_u32.saturating_pow(attempt))
}

fn serialize_body<B: Serialize + ?Sized>(
    body: Option<&B>,
) -> Result<Option<serde_json::Value>, WebflowError> {
    body.map(serde_json::to_value)
        .transpose()
        .map_err(|error| WebflowError::bad_request(
            format!("failed to serialize request body: {error}"),
            None,
        ))
}

fn build_headers(
    access_token: &str,
    extra_headers: Option<&HeaderMap>,
) -> Result<HeaderMap, WebflowError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some(extra) = extra_headers {
        for (name, value) in extra {
            headers.insert(name, value.clone());
        }
    }

    // Authorization always wins over caller-supplied headers.
    let mut authorization = HeaderValue::from_str(&format!("Bearer {access_token}"))
        .map_err(|_| WebflowError::Config {
            message: "access token contains characters invalid in a header".to_string(),
        })?;
    authorization.set_sensitive(true);
    headers.insert(AUTHORIZATION, authorization);

    Ok(headers)
}

fn decode_empty<T: DeserializeOwned>() -> Result<T, WebflowError> {
    serde_json::from_value(serde_json::Value::Object(serde_json::Map::new())).map_err(|error| {
        WebflowError::Network {
            message: format!("failed to decode empty response: {error}"),
            source: Some(Box::new(error)),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::rate_limit::RateLimitStrategy;

    fn test_client() -> HttpClient {
        HttpClient::new(OAuthToken::new("test-token"), WebflowConfig::default()).unwrap()
    }

    #[test]
    fn test_construction_requires_non_empty_token() {
        let result = HttpClient::new(OAuthToken::new(""), WebflowConfig::default());
        assert!(matches!(result, Err(WebflowError::Config { .. })));
    }

    #[test]
    fn test_config_accessor_returns_copy() {
        let client = test_client();
        let config = client.config();
        assert_eq!(config, WebflowConfig::default());
    }

    #[test]
    fn test_update_token_rejects_empty_token() {
        let client = test_client();
        let result = client.update_token(OAuthToken::new(""));
        assert!(matches!(result, Err(WebflowError::Config { .. })));
    }

    #[test]
    fn test_update_token_replaces_stored_token() {
        let client = test_client();
        client.update_token(OAuthToken::new("rotated")).unwrap();
        assert_eq!(client.fresh_access_token().unwrap(), "rotated");
    }

    #[test]
    fn test_expired_token_fails_before_dispatch() {
        let client = test_client();
        let expired = OAuthToken::new("stale")
            .with_expiry(chrono::Utc::now() - chrono::Duration::minutes(5));
        client.update_token(expired).unwrap();

        let result = client.fresh_access_token();
        assert!(matches!(result, Err(WebflowError::Auth { .. })));
    }

    #[test]
    fn test_backoff_schedule_is_exponential() {
        let base = Duration::from_millis(100);
        assert_eq!(backoff_delay(0, base), Duration::from_millis(100));
        assert_eq!(backoff_delay(1, base), Duration::from_millis(200));
        assert_eq!(backoff_delay(2, base), Duration::from_millis(400));
        assert_eq!(backoff_delay(3, base), Duration::from_millis(800));
    }

    #[test]
    fn test_backoff_saturates_instead_of_overflowing() {
        let delay = backoff_delay(40, Duration::from_secs(u64::MAX / 2));
        assert_eq!(delay, Duration::MAX);
    }

    #[test]
    fn test_mandatory_headers_win_over_extras() {
        let mut extra = HeaderMap::new();
        extra.insert(AUTHORIZATION, HeaderValue::from_static("Bearer attacker"));
        extra.insert("x-correlation-id", HeaderValue::from_static("abc-123"));

        let headers = build_headers("real-token", Some(&extra)).unwrap();

        assert_eq!(
            headers.get(AUTHORIZATION).unwrap().to_str().unwrap(),
            "Bearer real-token"
        );
        assert_eq!(
            headers.get("x-correlation-id").unwrap().to_str().unwrap(),
            "abc-123"
        );
        assert_eq!(
            headers.get(ACCEPT).unwrap().to_str().unwrap(),
            "application/json"
        );
        assert_eq!(
            headers.get(CONTENT_TYPE).unwrap().to_str().unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_authorization_header_is_sensitive() {
        let headers = build_headers("token", None).unwrap();
        assert!(headers.get(AUTHORIZATION).unwrap().is_sensitive());
    }

    #[test]
    fn test_decode_empty_yields_empty_object() {
        let value: serde_json::Value = decode_empty().unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }

    #[test]
    fn test_queue_strategy_client_constructs() {
        let config = WebflowConfig::builder()
            .rate_limit_strategy(RateLimitStrategy::Queue)
            .build()
            .unwrap();
        let client = HttpClient::new(OAuthToken::new("token"), config);
        assert!(client.is_ok());
    }
}
