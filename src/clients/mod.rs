//! HTTP client layer for Webflow API communication.
//!
//! This module is the single choke point for every outbound call. The main
//! types are:
//!
//! - [`HttpClient`]: the async client with `get()`, `post()`, `patch()`,
//!   `delete()` verb methods
//! - [`WebflowError`]: the typed error taxonomy every failure maps into
//! - [`RateLimitInfo`] / [`RateLimitStrategy`]: quota telemetry and the
//!   429 handling policy
//!
//! # Retry Behavior
//!
//! The client retries transient failures, bounded by the configured
//! `retries` ceiling, which is shared across all retryable paths:
//!
//! - **429 (rate limited)**: handled per [`RateLimitStrategy`]: fail
//!   immediately (`Throw`), wait out `Retry-After` and retry (`Retry`), or
//!   wait in line so only one rate-limited retry is in flight (`Queue`)
//! - **5xx (server error)**: exponential backoff, `2^attempt * retry_delay`
//! - **Transport errors** (timeout, connection refused): same backoff as
//!   5xx, unless the error signals token expiry
//! - **4xx other than 429**: returned immediately without retry
//!
//! Within one logical call retries are strictly sequential; independent
//! calls sharing a client are not ordered or serialized, except for the
//! rate-limited subset under the `Queue` strategy.

mod errors;
mod http_client;
mod query;
mod rate_limit;

pub use errors::{ApiErrorBody, WebflowError};
pub use http_client::{HttpClient, SDK_VERSION};
pub use query::build_query_string;
pub use rate_limit::{RateLimitInfo, RateLimitStrategy};
