//! # Webflow API Rust Client
//!
//! A Rust client for the Webflow REST API, providing an authenticated HTTP
//! client with rate-limit-aware retries and a typed error taxonomy.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`WebflowConfig`] and [`WebflowConfigBuilder`]
//! - Bearer token handling with lazy expiry checking via [`OAuthToken`]
//! - An async HTTP client with timeout enforcement, exponential backoff and
//!   configurable 429 handling via [`HttpClient`]
//! - A closed set of typed errors via [`WebflowError`], each carrying its
//!   numeric code and serializable to the wire error shape
//! - Rate limit telemetry via [`RateLimitInfo`] for "try again in N
//!   seconds" style messaging
//!
//! ## Quick Start
//!
//! ```rust
//! use webflow_api::{HttpClient, OAuthToken, WebflowConfig};
//!
//! let config = WebflowConfig::builder()
//!     .retries(2)
//!     .build()
//!     .unwrap();
//!
//! let client = HttpClient::new(OAuthToken::new("access-token"), config).unwrap();
//! ```
//!
//! ## Making API Requests
//!
//! ```rust,ignore
//! // GET with query parameters; `None`-valued keys are omitted.
//! let widgets: serde_json::Value = client
//!     .get("/widgets", Some(&[("q", Some("shoes".to_string())), ("page", None)]))
//!     .await?;
//!
//! // POST with a JSON body.
//! let created: serde_json::Value = client
//!     .post("/collections/123/items", Some(&serde_json::json!({ "name": "Item" })))
//!     .await?;
//! ```
//!
//! ## Error Handling
//!
//! Every failure surfaces as exactly one [`WebflowError`] variant; nothing
//! is logged-and-swallowed. Callers branch on the variant (or on
//! [`WebflowError::kind`] / [`WebflowError::code`]) for user-facing
//! messaging:
//!
//! ```rust,ignore
//! match client.get::<Site>("/sites/abc", None).await {
//!     Ok(site) => render(site),
//!     Err(WebflowError::RateLimit { info, .. }) => retry_later(info.retry_after),
//!     Err(WebflowError::Auth { .. }) => refresh_credentials(),
//!     Err(err) => show_error(err.kind(), err.to_string()),
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration is instance-based and passed
//!   explicitly; the environment populates it once, at startup
//! - **Fail-fast validation**: empty tokens and bad base URLs are rejected
//!   at construction time, before any network call
//! - **Thread-safe**: all types are `Send + Sync`; shared mutable state is
//!   limited to the token and the advisory rate-limit snapshot, both
//!   replaced whole with last-write-wins semantics
//! - **Async-first**: designed for the Tokio runtime; retries suspend
//!   rather than block

pub mod auth;
pub mod clients;
pub mod config;

// Re-export public types at crate root for convenience
pub use auth::OAuthToken;
pub use clients::{
    build_query_string, ApiErrorBody, HttpClient, RateLimitInfo, RateLimitStrategy, WebflowError,
    SDK_VERSION,
};
pub use config::{WebflowConfig, WebflowConfigBuilder, DEFAULT_BASE_URL};
