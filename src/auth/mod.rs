//! OAuth token handling for Webflow API authentication.
//!
//! This module provides the [`OAuthToken`] type that holds the bearer
//! credential used on every outbound request. The client only validates
//! token shape and expiry; acquiring and refreshing tokens is the job of
//! the surrounding application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A bearer credential for Webflow API calls.
///
/// Tokens are replaced wholesale via [`HttpClient::update_token`] and read
/// on every request to check expiry. Tokens without an `expires_at` are
/// considered never expired.
///
/// # Serialization
///
/// `expires_at` serializes as epoch milliseconds, matching the shape the
/// OAuth collaborator stores.
///
/// # Security
///
/// The `Debug` implementation masks the access and refresh tokens so they
/// cannot leak into logs.
///
/// # Example
///
/// ```rust
/// use webflow_api::OAuthToken;
///
/// let token = OAuthToken::new("access-token");
/// assert!(token.is_valid());
/// assert!(!token.expired());
/// ```
///
/// [`HttpClient::update_token`]: crate::HttpClient::update_token
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthToken {
    /// The bearer token sent in the `Authorization` header.
    pub access_token: String,

    /// The refresh token, if the grant issued one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// When the access token expires, as epoch milliseconds on the wire.
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires_at: Option<DateTime<Utc>>,
}

impl OAuthToken {
    /// Creates a token with only an access token.
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            expires_at: None,
        }
    }

    /// Attaches a refresh token.
    #[must_use]
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Attaches an expiry timestamp.
    #[must_use]
    pub const fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Returns `true` if this token has expired.
    ///
    /// Tokens without an expiry are considered never expired.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.expires_at.is_some_and(|expires| Utc::now() > expires)
    }

    /// Returns `true` if the token carries a non-empty access token.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.access_token.is_empty()
    }
}

impl fmt::Debug for OAuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthToken")
            .field("access_token", &"*****")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "*****"))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

// Verify OAuthToken is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OAuthToken>();
};
